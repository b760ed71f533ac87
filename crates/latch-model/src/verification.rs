//! Verification snapshots
//!
//! A `Verification` is the live state of one factor's challenge/response
//! cycle. It is created server-side on `prepare`, transitions on `attempt`,
//! and is held by the client as an immutable snapshot until the next
//! operation replaces it wholesale.

use serde::{Deserialize, Serialize};

use crate::api_error::ApiError;
use crate::strategy::Strategy;

/// Server-assigned verification state.
///
/// `Transferable` is only meaningful on verifications created via
/// external-identity strategies (OAuth / enterprise SSO): the external
/// identity is valid but does not match an existing account for this
/// operation, so the attempt must transfer to the opposite kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VerificationStatus {
    Unverified,
    Verified,
    Transferable,
    Expired,
    Failed,
    /// Forward-compatible catch-all; holds the raw wire string
    Unknown(String),
}

impl From<String> for VerificationStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "unverified" => VerificationStatus::Unverified,
            "verified" => VerificationStatus::Verified,
            "transferable" => VerificationStatus::Transferable,
            "expired" => VerificationStatus::Expired,
            "failed" => VerificationStatus::Failed,
            _ => VerificationStatus::Unknown(raw),
        }
    }
}

impl From<VerificationStatus> for String {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Unverified => "unverified".into(),
            VerificationStatus::Verified => "verified".into(),
            VerificationStatus::Transferable => "transferable".into(),
            VerificationStatus::Expired => "expired".into(),
            VerificationStatus::Failed => "failed".into(),
            VerificationStatus::Unknown(raw) => raw,
        }
    }
}

/// One verification attempt's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub status: VerificationStatus,
    /// The method this verification uses, once the server has bound one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    /// Attempts made so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    /// Absolute expiry, unix milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<i64>,
    /// Error the server attached to this specific verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Verification {
    pub fn is_transferable(&self) -> bool {
        self.status == VerificationStatus::Transferable
    }

    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_decode() {
        assert_eq!(
            VerificationStatus::from("verified".to_string()),
            VerificationStatus::Verified
        );
        assert_eq!(
            VerificationStatus::from("transferable".to_string()),
            VerificationStatus::Transferable
        );
    }

    #[test]
    fn unknown_status_round_trips() {
        let json = r#""some_future_value""#;
        let status: VerificationStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status, VerificationStatus::Unknown("some_future_value".into()));
        // Re-encoding yields the literal raw string, never "unknown"
        assert_eq!(serde_json::to_string(&status).unwrap(), json);
    }

    #[test]
    fn verification_decodes_with_sparse_fields() {
        let json = r#"{"status": "unverified", "strategy": "email_code"}"#;
        let v: Verification = serde_json::from_str(json).unwrap();
        assert_eq!(v.status, VerificationStatus::Unverified);
        assert_eq!(v.strategy, Some(Strategy::EmailCode));
        assert_eq!(v.attempts, None);
        assert_eq!(v.expire_at, None);
        assert!(v.error.is_none());
    }

    #[test]
    fn verification_carries_server_error() {
        let json = r#"{
            "status": "failed",
            "strategy": "email_code",
            "attempts": 3,
            "error": {"code": "verification_failed", "message": "Too many attempts."}
        }"#;
        let v: Verification = serde_json::from_str(json).unwrap();
        assert_eq!(v.status, VerificationStatus::Failed);
        assert_eq!(v.attempts, Some(3));
        assert_eq!(v.error.unwrap().code, "verification_failed");
    }

    #[test]
    fn transferable_predicate() {
        let v = Verification {
            status: VerificationStatus::Transferable,
            strategy: Some(Strategy::Oauth("google".into())),
            attempts: None,
            expire_at: None,
            error: None,
        };
        assert!(v.is_transferable());
        assert!(!v.is_verified());
    }
}
