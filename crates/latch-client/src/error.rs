//! Error types for orchestration operations
//!
//! User cancellation is deliberately absent: it is a value, not an
//! error. See the correlator and passkey modules.

use latch_model::ApiError;

/// Errors from orchestration operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure before any server decision was made
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The server rejected the operation with a structured error
    #[error("server rejected operation: {0}")]
    Api(ApiError),

    /// Non-2xx response whose body was not a structured error
    #[error("unexpected response ({status}): {body}")]
    Response { status: u16, body: String },

    /// Client/server contract mismatch detected locally; report as an SDK bug
    #[error("client invariant violated: {0}")]
    Invariant(String),

    /// The external redirect session itself failed (not a cancellation)
    #[error("external auth failed: {0}")]
    ExternalAuth(String),

    /// `begin` was called while a redirect flow was already pending
    #[error("an external auth flow is already in progress")]
    FlowInProgress,
}

/// Result alias for orchestration operations.
pub type Result<T> = std::result::Result<T, Error>;
