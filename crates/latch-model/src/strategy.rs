//! Verification strategy taxonomy
//!
//! `Strategy` is the factor-level union: which method a verification uses.
//! Wire form is the literal strategy string the backend speaks. OAuth
//! providers are folded into the string (`oauth_google`, `oauth_github`),
//! so decoding peels the `oauth_` prefix back off.
//!
//! Unrecognized strings are preserved verbatim in `Unknown` so a newer
//! backend never crashes an older client, and re-encoding emits exactly
//! what was received.

use serde::{Deserialize, Serialize};
use std::fmt;

const OAUTH_PREFIX: &str = "oauth_";

/// A verification method offered by or active on an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Strategy {
    Password,
    EmailCode,
    PhoneCode,
    /// External OAuth identity, e.g. `Oauth("google")` ⇔ `oauth_google`
    Oauth(String),
    EnterpriseSso,
    Passkey,
    Totp,
    BackupCode,
    ResetPasswordEmailCode,
    ResetPasswordPhoneCode,
    /// Re-create the opposite attempt kind from a prior external-auth result
    Transfer,
    Ticket,
    /// Forward-compatible catch-all; holds the raw wire string
    Unknown(String),
}

impl From<String> for Strategy {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "password" => Strategy::Password,
            "email_code" => Strategy::EmailCode,
            "phone_code" => Strategy::PhoneCode,
            "enterprise_sso" => Strategy::EnterpriseSso,
            "passkey" => Strategy::Passkey,
            "totp" => Strategy::Totp,
            "backup_code" => Strategy::BackupCode,
            "reset_password_email_code" => Strategy::ResetPasswordEmailCode,
            "reset_password_phone_code" => Strategy::ResetPasswordPhoneCode,
            "transfer" => Strategy::Transfer,
            "ticket" => Strategy::Ticket,
            _ => {
                if let Some(provider) = raw.strip_prefix(OAUTH_PREFIX) {
                    Strategy::Oauth(provider.to_owned())
                } else {
                    Strategy::Unknown(raw)
                }
            }
        }
    }
}

impl From<Strategy> for String {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Password => "password".into(),
            Strategy::EmailCode => "email_code".into(),
            Strategy::PhoneCode => "phone_code".into(),
            Strategy::Oauth(provider) => format!("{OAUTH_PREFIX}{provider}"),
            Strategy::EnterpriseSso => "enterprise_sso".into(),
            Strategy::Passkey => "passkey".into(),
            Strategy::Totp => "totp".into(),
            Strategy::BackupCode => "backup_code".into(),
            Strategy::ResetPasswordEmailCode => "reset_password_email_code".into(),
            Strategy::ResetPasswordPhoneCode => "reset_password_phone_code".into(),
            Strategy::Transfer => "transfer".into(),
            Strategy::Ticket => "ticket".into(),
            Strategy::Unknown(raw) => raw,
        }
    }
}

impl Strategy {
    /// The literal strategy string sent on the wire.
    pub fn wire(&self) -> String {
        String::from(self.clone())
    }

    /// Whether this strategy completes out-of-band via a browser redirect.
    pub fn is_redirect_based(&self) -> bool {
        matches!(self, Strategy::Oauth(_) | Strategy::EnterpriseSso)
    }

    /// Whether this strategy belongs to the reset-password family.
    pub fn is_reset_password(&self) -> bool {
        matches!(
            self,
            Strategy::ResetPasswordEmailCode | Strategy::ResetPasswordPhoneCode
        )
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_strings_decode() {
        assert_eq!(Strategy::from("password".to_string()), Strategy::Password);
        assert_eq!(Strategy::from("email_code".to_string()), Strategy::EmailCode);
        assert_eq!(Strategy::from("totp".to_string()), Strategy::Totp);
        assert_eq!(Strategy::from("transfer".to_string()), Strategy::Transfer);
    }

    #[test]
    fn oauth_prefix_carries_provider() {
        assert_eq!(
            Strategy::from("oauth_google".to_string()),
            Strategy::Oauth("google".into())
        );
        assert_eq!(Strategy::Oauth("github".into()).wire(), "oauth_github");
    }

    #[test]
    fn unknown_round_trips_raw_string() {
        let decoded = Strategy::from("web5_quantum_handshake".to_string());
        assert_eq!(decoded, Strategy::Unknown("web5_quantum_handshake".into()));
        assert_eq!(decoded.wire(), "web5_quantum_handshake");
    }

    #[test]
    fn serde_round_trip_preserves_unknown() {
        let json = r#""some_future_strategy""#;
        let strategy: Strategy = serde_json::from_str(json).unwrap();
        assert_eq!(strategy, Strategy::Unknown("some_future_strategy".into()));
        assert_eq!(serde_json::to_string(&strategy).unwrap(), json);
    }

    #[test]
    fn redirect_based_strategies() {
        assert!(Strategy::Oauth("google".into()).is_redirect_based());
        assert!(Strategy::EnterpriseSso.is_redirect_based());
        assert!(!Strategy::Password.is_redirect_based());
        assert!(!Strategy::Passkey.is_redirect_based());
    }

    #[test]
    fn reset_password_family() {
        assert!(Strategy::ResetPasswordEmailCode.is_reset_password());
        assert!(Strategy::ResetPasswordPhoneCode.is_reset_password());
        assert!(!Strategy::EmailCode.is_reset_password());
    }
}
