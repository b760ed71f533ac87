//! SDK configuration and the process-wide configuration slot
//!
//! Config precedence: programmatic `configure()` > config file > defaults.
//! The slot is read at wire-parameter build time, not at strategy
//! construction time, so late reconfiguration of `redirect_url` is picked
//! up by redirect-based strategies that were built earlier.

use std::path::Path;
use std::sync::RwLock;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Default backend origin. Deployments always override this.
pub const DEFAULT_API_URL: &str = "https://api.latch.dev";

/// Default redirect URL handed to OAuth / enterprise SSO strategies when
/// the caller does not supply one.
pub const DEFAULT_REDIRECT_URL: &str = "latch://external-auth/callback";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// SDK configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Backend origin, e.g. `https://api.example.com`
    pub api_url: String,
    /// Default redirect URL for external-auth strategies
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    /// Transport timeout for each orchestration call
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_redirect_url() -> String {
    DEFAULT_REDIRECT_URL.to_owned()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            redirect_url: default_redirect_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field constraints shared by all construction paths.
    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "api_url must start with http:// or https://, got: {}",
                self.api_url
            )));
        }

        if self.redirect_url.is_empty() {
            return Err(Error::Config("redirect_url must not be empty".into()));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than 0".into()));
        }

        Ok(())
    }
}

/// Process-wide configuration. `None` means "defaults".
static CONFIG: RwLock<Option<Config>> = RwLock::new(None);

/// Install the given configuration process-wide.
///
/// Returns an error (leaving the previous configuration in place) if the
/// new configuration is invalid.
pub fn configure(config: Config) -> Result<()> {
    config.validate()?;
    debug!(api_url = %config.api_url, "sdk configured");
    let mut slot = CONFIG.write().expect("config lock poisoned");
    *slot = Some(config);
    Ok(())
}

/// Snapshot of the current process-wide configuration.
///
/// Falls back to [`Config::default`] when `configure` was never called.
pub fn current() -> Config {
    let slot = CONFIG.read().expect("config lock poisoned");
    slot.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that touch the process-wide slot.
    static SLOT_MUTEX: Mutex<()> = Mutex::new(());

    fn valid_toml() -> &'static str {
        r#"
api_url = "https://api.example.com"
redirect_url = "myapp://callback"
timeout_secs = 10
"#
    }

    #[test]
    fn load_valid_config() {
        let dir = std::env::temp_dir().join("latch-config-test-valid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, valid_toml()).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.redirect_url, "myapp://callback");
        assert_eq!(config.timeout_secs, 10);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("latch-config-test-invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "not valid {{{{ toml").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let config: Config = toml::from_str(r#"api_url = "https://api.example.com""#).unwrap();
        assert_eq!(config.redirect_url, DEFAULT_REDIRECT_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn api_url_without_scheme_rejected() {
        let config = Config {
            api_url: "api.example.com".into(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            err.to_string().contains("api_url must start with http"),
            "got: {err}"
        );
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_redirect_url_rejected() {
        let config = Config {
            redirect_url: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn configure_replaces_current() {
        let _lock = SLOT_MUTEX.lock().unwrap();
        configure(Config {
            api_url: "https://one.example.com".into(),
            ..Config::default()
        })
        .unwrap();
        assert_eq!(current().api_url, "https://one.example.com");

        configure(Config {
            api_url: "https://two.example.com".into(),
            ..Config::default()
        })
        .unwrap();
        assert_eq!(current().api_url, "https://two.example.com");
    }

    #[test]
    fn configure_invalid_keeps_previous() {
        let _lock = SLOT_MUTEX.lock().unwrap();
        configure(Config {
            api_url: "https://kept.example.com".into(),
            ..Config::default()
        })
        .unwrap();

        let result = configure(Config {
            api_url: "no-scheme".into(),
            ..Config::default()
        });
        assert!(result.is_err());
        assert_eq!(current().api_url, "https://kept.example.com");
    }
}
