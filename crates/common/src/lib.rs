//! Shared foundation for the latch SDK crates
//!
//! Holds the common error type and the process-wide SDK configuration.
//! The configuration slot exists so that redirect-based strategies can
//! resolve a default `redirect_url` at the moment wire parameters are
//! built, honoring reconfiguration that happens after a strategy value
//! was constructed.

pub mod config;
pub mod error;

pub use config::{Config, configure, current};
pub use error::{Error, Result};
