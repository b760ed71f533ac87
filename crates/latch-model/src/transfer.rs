//! Transfer-flow result
//!
//! Any external-identity-driven operation can resolve to either attempt
//! kind: the server may match the identity to an existing account (sign
//! in) or find no account and require registration (sign up). Callers get
//! the union and branch once.

use serde::{Deserialize, Serialize};

use crate::sign_in::SignIn;
use crate::sign_up::SignUp;

/// Which attempt kind initiated a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptKind {
    SignIn,
    SignUp,
}

/// Uniform output of external-identity-driven operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferFlowResult {
    SignIn(SignIn),
    SignUp(SignUp),
}

impl TransferFlowResult {
    pub fn kind(&self) -> AttemptKind {
        match self {
            TransferFlowResult::SignIn(_) => AttemptKind::SignIn,
            TransferFlowResult::SignUp(_) => AttemptKind::SignUp,
        }
    }

    /// The created session id, when the wrapped attempt completed.
    pub fn created_session_id(&self) -> Option<&str> {
        match self {
            TransferFlowResult::SignIn(sign_in) => sign_in.created_session_id.as_deref(),
            TransferFlowResult::SignUp(sign_up) => sign_up.created_session_id.as_deref(),
        }
    }
}
