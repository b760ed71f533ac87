//! The SignIn attempt resource
//!
//! A versioned snapshot returned by the server. Every orchestration
//! operation's response replaces the whole value; the `id` is the only
//! field that is stable across the attempt's lifetime.

use serde::{Deserialize, Serialize};

use crate::factor::Factor;
use crate::verification::Verification;

/// Server-assigned attempt state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignInStatus {
    NeedsIdentifier,
    NeedsFirstFactor,
    NeedsSecondFactor,
    NeedsNewPassword,
    /// Additional verification required for an unrecognized device/client
    NeedsClientTrust,
    Complete,
    /// Forward-compatible catch-all; holds the raw wire string
    Unknown(String),
}

impl From<String> for SignInStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "needs_identifier" => SignInStatus::NeedsIdentifier,
            "needs_first_factor" => SignInStatus::NeedsFirstFactor,
            "needs_second_factor" => SignInStatus::NeedsSecondFactor,
            "needs_new_password" => SignInStatus::NeedsNewPassword,
            "needs_client_trust" => SignInStatus::NeedsClientTrust,
            "complete" => SignInStatus::Complete,
            _ => SignInStatus::Unknown(raw),
        }
    }
}

impl From<SignInStatus> for String {
    fn from(status: SignInStatus) -> Self {
        match status {
            SignInStatus::NeedsIdentifier => "needs_identifier".into(),
            SignInStatus::NeedsFirstFactor => "needs_first_factor".into(),
            SignInStatus::NeedsSecondFactor => "needs_second_factor".into(),
            SignInStatus::NeedsNewPassword => "needs_new_password".into(),
            SignInStatus::NeedsClientTrust => "needs_client_trust".into(),
            SignInStatus::Complete => "complete".into(),
            SignInStatus::Unknown(raw) => raw,
        }
    }
}

/// An in-progress sign-in attempt.
///
/// `created_session_id` is non-`None` iff `status == Complete`; it is the
/// sole success signal. Factor lists keep the server's order, which the
/// orchestrator relies on for first-match-wins lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignIn {
    pub id: String,
    pub status: SignInStatus,
    /// The identifier being authenticated, once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_first_factors: Option<Vec<Factor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_second_factors: Option<Vec<Factor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_factor_verification: Option<Verification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_factor_verification: Option<Verification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_session_id: Option<String>,
}

impl SignIn {
    pub fn is_complete(&self) -> bool {
        self.status == SignInStatus::Complete
    }

    /// First factors, as an always-valid slice.
    pub fn first_factors(&self) -> &[Factor] {
        self.supported_first_factors.as_deref().unwrap_or(&[])
    }

    /// Second factors, as an always-valid slice.
    pub fn second_factors(&self) -> &[Factor] {
        self.supported_second_factors.as_deref().unwrap_or(&[])
    }
}
