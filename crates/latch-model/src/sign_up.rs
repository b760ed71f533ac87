//! The SignUp attempt resource
//!
//! Structurally analogous to `SignIn` but verifications are keyed by field
//! name (`"email_address"`, `"phone_number"`, `"external_account"`) rather
//! than first/second tier. Shares the wholesale-snapshot-replace lifecycle
//! and the same transfer-eligibility signal shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::verification::Verification;

/// Field name under which external-identity verifications are keyed.
pub const EXTERNAL_ACCOUNT_FIELD: &str = "external_account";

/// Server-assigned attempt state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignUpStatus {
    MissingRequirements,
    Abandoned,
    Complete,
    /// Forward-compatible catch-all; holds the raw wire string
    Unknown(String),
}

impl From<String> for SignUpStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "missing_requirements" => SignUpStatus::MissingRequirements,
            "abandoned" => SignUpStatus::Abandoned,
            "complete" => SignUpStatus::Complete,
            _ => SignUpStatus::Unknown(raw),
        }
    }
}

impl From<SignUpStatus> for String {
    fn from(status: SignUpStatus) -> Self {
        match status {
            SignUpStatus::MissingRequirements => "missing_requirements".into(),
            SignUpStatus::Abandoned => "abandoned".into(),
            SignUpStatus::Complete => "complete".into(),
            SignUpStatus::Unknown(raw) => raw,
        }
    }
}

/// An in-progress sign-up attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUp {
    pub id: String,
    pub status: SignUpStatus,
    /// Fields the deployment requires before the attempt can complete
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Required fields not yet collected
    #[serde(default)]
    pub missing_fields: Vec<String>,
    /// Collected fields awaiting verification
    #[serde(default)]
    pub unverified_fields: Vec<String>,
    /// Active verifications, keyed by field name
    #[serde(default)]
    pub verifications: HashMap<String, Verification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_session_id: Option<String>,
}

impl SignUp {
    pub fn is_complete(&self) -> bool {
        self.status == SignUpStatus::Complete
    }

    /// The verification for a given field, if one is active.
    pub fn verification(&self, field: &str) -> Option<&Verification> {
        self.verifications.get(field)
    }

    /// The external-identity verification, if one is active.
    pub fn external_account_verification(&self) -> Option<&Verification> {
        self.verification(EXTERNAL_ACCOUNT_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::VerificationStatus;

    #[test]
    fn status_unknown_round_trips() {
        let json = r#""some_future_value""#;
        let status: SignUpStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status, SignUpStatus::Unknown("some_future_value".into()));
        assert_eq!(serde_json::to_string(&status).unwrap(), json);
    }

    #[test]
    fn decodes_field_keyed_verifications() {
        let json = r#"{
            "id": "sua_123",
            "status": "missing_requirements",
            "required_fields": ["email_address", "password"],
            "missing_fields": ["password"],
            "unverified_fields": ["email_address"],
            "verifications": {
                "email_address": {"status": "unverified", "strategy": "email_code"},
                "external_account": {"status": "transferable", "strategy": "oauth_google"}
            }
        }"#;
        let sign_up: SignUp = serde_json::from_str(json).unwrap();
        assert_eq!(sign_up.status, SignUpStatus::MissingRequirements);
        assert_eq!(sign_up.missing_fields, vec!["password"]);
        assert_eq!(
            sign_up.verification("email_address").unwrap().status,
            VerificationStatus::Unverified
        );
        assert!(
            sign_up
                .external_account_verification()
                .unwrap()
                .is_transferable()
        );
    }

    #[test]
    fn sparse_snapshot_decodes_with_empty_collections() {
        let json = r#"{"id": "sua_123", "status": "complete", "created_session_id": "sess_9"}"#;
        let sign_up: SignUp = serde_json::from_str(json).unwrap();
        assert!(sign_up.is_complete());
        assert!(sign_up.required_fields.is_empty());
        assert!(sign_up.verifications.is_empty());
        assert!(sign_up.external_account_verification().is_none());
    }
}
