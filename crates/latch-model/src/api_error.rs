//! Structured errors surfaced by the backend
//!
//! Server-rejected operations arrive as a JSON body of the form
//! `{"errors": [{"code": ..., "message": ..., ...}]}`. The SDK propagates
//! these verbatim; it never swallows or rewrites a server rejection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One machine-readable rejection from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable machine-readable code, e.g. `form_password_incorrect`
    pub code: String,
    /// Short human-readable message
    pub message: String,
    /// Longer explanation, when the backend provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_message: Option<String>,
    /// Per-field metadata, e.g. which parameter was invalid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Error body envelope returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub errors: Vec<ApiError>,
}

impl ApiErrorResponse {
    /// The primary error, when the backend sent at least one.
    pub fn primary(self) -> Option<ApiError> {
        self.errors.into_iter().next()
    }
}
