//! Passkey credential boundary
//!
//! The SDK performs no WebAuthn cryptography. The platform credential
//! provider is handed the server-issued challenge and returns either an
//! assertion (sign-in) or an attestation (registration); this module only
//! serializes that result into the JSON shape the backend expects and
//! passes it along as an opaque string parameter.
//!
//! Platform-level user cancellation is a value (`PromptOutcome::Cancelled`),
//! mirroring the redirect correlator's semantics.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use latch_model::FirstFactorAttemptParams;

use crate::error::Result;

/// Result of presenting a platform credential sheet. Cancellation is
/// expected user behavior, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome<T> {
    Completed(T),
    Cancelled,
}

/// A WebAuthn authentication result. All payloads are opaque bytes; the
/// SDK never interprets or validates them.
#[derive(Debug, Clone, PartialEq)]
pub struct PasskeyAssertion {
    pub credential_id: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
    pub client_data_json: Vec<u8>,
}

/// A WebAuthn registration result.
#[derive(Debug, Clone, PartialEq)]
pub struct PasskeyAttestation {
    pub credential_id: Vec<u8>,
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
}

/// Platform credential provider. External collaborator boundary: the
/// implementation presents the system passkey UI and performs the
/// cryptography.
pub trait CredentialProvider: Send + Sync {
    /// Authenticate against an existing credential.
    fn get_assertion(&self, challenge: &[u8]) -> Result<PromptOutcome<PasskeyAssertion>>;

    /// Register a new credential for the given user.
    fn create_credential(
        &self,
        challenge: &[u8],
        user_name: &str,
        user_handle: &[u8],
    ) -> Result<PromptOutcome<PasskeyAttestation>>;
}

impl PasskeyAssertion {
    /// The serialized credential, ready for `attempt_first_factor`.
    pub fn to_attempt_params(&self) -> FirstFactorAttemptParams {
        FirstFactorAttemptParams::Passkey {
            public_key_credential: assertion_credential_json(self),
        }
    }
}

/// Serialize an assertion into the WebAuthn JSON shape the backend's
/// attempt endpoint expects.
pub fn assertion_credential_json(assertion: &PasskeyAssertion) -> String {
    let id = URL_SAFE_NO_PAD.encode(&assertion.credential_id);
    json!({
        "type": "public-key",
        "id": id,
        "rawId": id,
        "response": {
            "authenticatorData": URL_SAFE_NO_PAD.encode(&assertion.authenticator_data),
            "clientDataJSON": URL_SAFE_NO_PAD.encode(&assertion.client_data_json),
            "signature": URL_SAFE_NO_PAD.encode(&assertion.signature),
            "userHandle": assertion
                .user_handle
                .as_ref()
                .map(|h| URL_SAFE_NO_PAD.encode(h)),
        }
    })
    .to_string()
}

/// Serialize an attestation into the WebAuthn JSON shape the backend's
/// passkey registration endpoint expects.
pub fn attestation_credential_json(attestation: &PasskeyAttestation) -> String {
    let id = URL_SAFE_NO_PAD.encode(&attestation.credential_id);
    json!({
        "type": "public-key",
        "id": id,
        "rawId": id,
        "response": {
            "attestationObject": URL_SAFE_NO_PAD.encode(&attestation.attestation_object),
            "clientDataJSON": URL_SAFE_NO_PAD.encode(&attestation.client_data_json),
        }
    })
    .to_string()
}
