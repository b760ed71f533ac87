//! Factor offers
//!
//! A `Factor` is a capability offer: a strategy bound to an optional
//! contact channel. It becomes "active" only when the attempt's first or
//! second factor verification references the same strategy.

use serde::{Deserialize, Serialize};

use crate::strategy::Strategy;

/// One available verification method on an attempt.
///
/// Equality covers the strategy and all identifier fields: two factors
/// with the same strategy bound to different email addresses are distinct
/// offers, which is what alternative-factor enumeration relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub strategy: Strategy,
    /// Redacted-but-displayable identifier, e.g. `u***@example.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_identifier: Option<String>,
    /// Targets a specific email address when more than one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address_id: Option<String>,
    /// Targets a specific phone number when more than one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_id: Option<String>,
}

impl Factor {
    /// Whether this factor offers the given strategy for the given
    /// displayable identifier.
    pub fn identifies(&self, strategy: &Strategy, identifier: &str) -> bool {
        self.strategy == *strategy && self.safe_identifier.as_deref() == Some(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_factor(safe: &str, id: &str) -> Factor {
        Factor {
            strategy: Strategy::EmailCode,
            safe_identifier: Some(safe.into()),
            email_address_id: Some(id.into()),
            phone_number_id: None,
        }
    }

    #[test]
    fn same_strategy_different_channel_not_equal() {
        let a = email_factor("a***@example.com", "eml_1");
        let b = email_factor("b***@example.com", "eml_2");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn identifies_requires_both_strategy_and_identifier() {
        let factor = email_factor("u***@example.com", "eml_1");
        assert!(factor.identifies(&Strategy::EmailCode, "u***@example.com"));
        assert!(!factor.identifies(&Strategy::PhoneCode, "u***@example.com"));
        assert!(!factor.identifies(&Strategy::EmailCode, "x***@example.com"));
    }

    #[test]
    fn decodes_from_wire_shape() {
        let json = r#"{
            "strategy": "phone_code",
            "safe_identifier": "+1*******42",
            "phone_number_id": "phn_1"
        }"#;
        let factor: Factor = serde_json::from_str(json).unwrap();
        assert_eq!(factor.strategy, Strategy::PhoneCode);
        assert_eq!(factor.phone_number_id.as_deref(), Some("phn_1"));
        assert_eq!(factor.email_address_id, None);
    }
}
