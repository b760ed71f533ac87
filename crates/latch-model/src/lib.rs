//! Data model for the latch authentication SDK
//!
//! Leaf types shared by the orchestration layer: verification and factor
//! snapshots, the strategy taxonomy with its wire-parameter builders, the
//! versioned SignIn/SignUp attempt resources, and the structured API error.
//!
//! Two rules hold throughout:
//! 1. Snapshots are immutable values. The server replaces them wholesale;
//!    nothing here is ever patched in place.
//! 2. Server enums are forward-compatible. An unrecognized wire string
//!    decodes to `Unknown(raw)` and re-encodes to the same raw string,
//!    never to a literal `"unknown"`.

pub mod api_error;
pub mod factor;
pub mod params;
pub mod sign_in;
pub mod sign_up;
pub mod strategy;
pub mod transfer;
pub mod verification;

pub use api_error::{ApiError, ApiErrorResponse};
pub use factor::Factor;
pub use params::{
    FirstFactorAttemptParams, FirstFactorPrepareParams, SecondFactorAttemptParams,
    SecondFactorPrepareParams, SignInCreateParams, SignUpAttemptVerificationParams,
    SignUpCreateParams, SignUpPrepareVerificationParams, WireParams,
};
pub use sign_in::{SignIn, SignInStatus};
pub use sign_up::{SignUp, SignUpStatus};
pub use strategy::Strategy;
pub use transfer::{AttemptKind, TransferFlowResult};
pub use verification::{Verification, VerificationStatus};
