//! External-auth correlator
//!
//! Owns exactly one in-flight redirect-based authentication session and
//! resumes it exactly once from an asynchronous callback. Platform
//! redirect APIs can invoke their completion handler more than once under
//! races with manual cancellation, so the state machine
//! (idle → awaiting callback → resolving → done) is guarded by a single
//! mutex and late callbacks are log-and-ignore no-ops.
//!
//! Flow:
//! 1. `begin()` registers the pending correlation, opens the redirect via
//!    the platform opener, and suspends on a oneshot receiver.
//! 2. The app delivers the callback URL (or error) to `handle_callback()`.
//! 3. Cancellation resolves to `Cancelled` (expected user behavior, not a
//!    failure); a rotation nonce in the URL consumes the rotating token
//!    via `get`; a nonce-less URL re-fetches state and applies
//!    transfer-flow resolution.

use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};
use url::Url;

use latch_model::{AttemptKind, TransferFlowResult};

use crate::error::{Error, Result};
use crate::orchestrator;
use crate::transport::ApiClient;

/// Query parameter correlating a callback to its rotating token.
pub const ROTATING_TOKEN_NONCE_PARAM: &str = "rotating_token_nonce";

/// How the platform redirect session ended, as reported by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The user dismissed the browser session
    Cancelled,
    /// The session failed for any other platform reason
    Failed(String),
}

/// Outcome of one redirect flow. Cancellation is a value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalAuthOutcome {
    Completed(TransferFlowResult),
    Cancelled,
}

/// Opens the redirect URL in the platform's external user agent.
/// External collaborator boundary; implementations must not block on the
/// user completing authentication.
pub trait RedirectOpener: Send + Sync {
    fn open(&self, url: &Url) -> Result<()>;
}

struct Pending {
    tx: oneshot::Sender<Result<ExternalAuthOutcome>>,
    kind: AttemptKind,
    attempt_id: String,
}

enum FlowState {
    Idle,
    AwaitingCallback(Pending),
    Resolving,
    Done,
}

impl FlowState {
    fn label(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::AwaitingCallback(_) => "awaiting_callback",
            FlowState::Resolving => "resolving",
            FlowState::Done => "done",
        }
    }
}

/// Correlates one redirect-based external-auth session with its callback.
pub struct ExternalAuthFlow<O: RedirectOpener> {
    api: ApiClient,
    opener: O,
    state: Mutex<FlowState>,
}

impl<O: RedirectOpener> ExternalAuthFlow<O> {
    pub fn new(api: ApiClient, opener: O) -> Self {
        Self {
            api,
            opener,
            state: Mutex::new(FlowState::Idle),
        }
    }

    /// Open the redirect session and suspend until its callback resolves.
    ///
    /// Exactly one correlation may be pending; calling `begin` while one
    /// is awaiting or resolving rejects immediately rather than silently
    /// replacing (and thereby orphaning) the pending future.
    pub async fn begin(
        &self,
        kind: AttemptKind,
        attempt_id: impl Into<String>,
        authorize_url: &Url,
    ) -> Result<ExternalAuthOutcome> {
        let attempt_id = attempt_id.into();
        let rx = {
            let mut state = self.state.lock().await;
            match *state {
                FlowState::Idle | FlowState::Done => {}
                FlowState::AwaitingCallback(_) | FlowState::Resolving => {
                    return Err(Error::FlowInProgress);
                }
            }
            let (tx, rx) = oneshot::channel();
            *state = FlowState::AwaitingCallback(Pending {
                tx,
                kind,
                attempt_id,
            });
            rx
        };

        info!(url = %authorize_url, "opening external auth session");
        if let Err(e) = self.opener.open(authorize_url) {
            let mut state = self.state.lock().await;
            *state = FlowState::Idle;
            return Err(e);
        }

        match rx.await {
            Ok(result) => result,
            // The sender is only dropped if the flow itself is dropped
            // mid-callback; surfaces as an SDK bug, not a server error.
            Err(_) => Err(Error::Invariant(
                "external auth flow dropped before its callback resolved".into(),
            )),
        }
    }

    /// Deliver the redirect callback. Resolves the pending `begin` future
    /// exactly once; invocations with no pending correlation are ignored.
    pub async fn handle_callback(&self, url: Option<Url>, error: Option<CallbackError>) {
        let pending = {
            let mut state = self.state.lock().await;
            match std::mem::replace(&mut *state, FlowState::Resolving) {
                FlowState::AwaitingCallback(pending) => pending,
                other => {
                    debug!(state = other.label(), "callback with no pending flow, ignoring");
                    *state = other;
                    return;
                }
            }
        };

        let result = self
            .resolve(pending.kind, &pending.attempt_id, url, error)
            .await;

        {
            let mut state = self.state.lock().await;
            *state = FlowState::Done;
        }

        if pending.tx.send(result).is_err() {
            warn!("external auth receiver dropped before resolution");
        }
    }

    async fn resolve(
        &self,
        kind: AttemptKind,
        attempt_id: &str,
        url: Option<Url>,
        error: Option<CallbackError>,
    ) -> Result<ExternalAuthOutcome> {
        match error {
            Some(CallbackError::Cancelled) => {
                info!(attempt_id, "external auth cancelled by user");
                return Ok(ExternalAuthOutcome::Cancelled);
            }
            Some(CallbackError::Failed(message)) => {
                return Err(Error::ExternalAuth(message));
            }
            None => {}
        }

        let url = url.ok_or_else(|| {
            Error::Invariant("external auth callback carried neither URL nor error".into())
        })?;

        let nonce = rotating_token_nonce(&url);
        debug!(attempt_id, has_nonce = nonce.is_some(), "resolving external auth callback");

        let result = match kind {
            AttemptKind::SignIn => {
                let sign_in = self.api.get_sign_in(attempt_id, nonce.as_deref()).await?;
                if nonce.is_some() {
                    // The server already resolved the external identity;
                    // the nonce consumed the rotating token.
                    TransferFlowResult::SignIn(sign_in)
                } else {
                    // Informational callback: the attempt's transferable
                    // status drives the next action.
                    orchestrator::resolve_transfer(&self.api, &sign_in).await?
                }
            }
            AttemptKind::SignUp => {
                let sign_up = self.api.get_sign_up(attempt_id, nonce.as_deref()).await?;
                if nonce.is_some() {
                    TransferFlowResult::SignUp(sign_up)
                } else {
                    orchestrator::resolve_sign_up_transfer(&self.api, &sign_up).await?
                }
            }
        };

        Ok(ExternalAuthOutcome::Completed(result))
    }
}

/// Extract the rotation nonce from a callback URL. Absence is meaningful
/// (informational callback), not an error.
pub fn rotating_token_nonce(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == ROTATING_TOKEN_NONCE_PARAM)
        .map(|(_, value)| value.into_owned())
}
