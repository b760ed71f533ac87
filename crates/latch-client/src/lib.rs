//! Orchestration layer of the latch authentication SDK
//!
//! Drives the multi-step, server-authoritative handshake over the attempt
//! resources defined in `latch-model`. The client never computes an
//! authentication decision; it drives the protocol and reconciles local
//! state with whatever snapshot the server returns.
//!
//! Typical sign-in flow:
//! 1. `SignInSession::create()` with a `SignInCreateParams` strategy
//! 2. `session.next_step()` to learn what to collect
//! 3. `session.prepare_first_factor()` / `session.attempt_first_factor()`
//!    (and the second-factor pair when required)
//! 4. Repeat from step 2 until `Step::Done(session_id)`
//!
//! Redirect-based strategies (OAuth / enterprise SSO) go through
//! `ExternalAuthFlow::begin()` instead, which correlates the asynchronous
//! callback and applies transfer-flow resolution when the external
//! identity does not match an existing account.

pub mod correlator;
pub mod error;
pub mod orchestrator;
pub mod passkey;
pub mod session;
pub mod transport;

pub use correlator::{
    CallbackError, ExternalAuthFlow, ExternalAuthOutcome, RedirectOpener, rotating_token_nonce,
};
pub use error::{Error, Result};
pub use orchestrator::{
    Step, alternative_factors, identifying_factor, needs_transfer, next_step,
    reset_password_factor, resolve_sign_up_transfer, resolve_transfer, sign_up_needs_transfer,
};
pub use passkey::{
    CredentialProvider, PasskeyAssertion, PasskeyAttestation, PromptOutcome,
    assertion_credential_json, attestation_credential_json,
};
pub use session::{SignInSession, SignUpSession};
pub use transport::ApiClient;
