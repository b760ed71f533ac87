//! Serialized attempt sessions
//!
//! An attempt snapshot is an immutable value; "mutation" is wholesale
//! replacement. The sessions here put that replacement behind a single
//! tokio Mutex, held across the transport call, so no two mutating
//! operations interleave on one attempt and no operation composes its
//! request from a stale snapshot.
//!
//! On any error the previous snapshot is left untouched, so the caller
//! can always redisplay the prior step.

use tokio::sync::Mutex;
use tracing::debug;

use latch_model::{
    Factor, FirstFactorAttemptParams, FirstFactorPrepareParams, SecondFactorAttemptParams,
    SecondFactorPrepareParams, SignIn, SignInCreateParams, SignUp,
    SignUpAttemptVerificationParams, SignUpCreateParams, SignUpPrepareVerificationParams,
    TransferFlowResult,
};

use crate::error::Result;
use crate::orchestrator::{self, Step};
use crate::transport::ApiClient;

/// A sign-in attempt with serialized snapshot replacement.
#[derive(Debug)]
pub struct SignInSession {
    api: ApiClient,
    current: Mutex<SignIn>,
}

impl SignInSession {
    /// Create a new attempt and wrap the initial snapshot.
    pub async fn create(api: ApiClient, params: &SignInCreateParams) -> Result<Self> {
        let sign_in = api.create_sign_in(params).await?;
        debug!(sign_in_id = %sign_in.id, "sign-in attempt created");
        Ok(Self {
            api,
            current: Mutex::new(sign_in),
        })
    }

    /// Adopt an existing snapshot (e.g. handed over from a redirect flow).
    pub fn from_snapshot(api: ApiClient, sign_in: SignIn) -> Self {
        Self {
            api,
            current: Mutex::new(sign_in),
        }
    }

    /// Clone of the latest snapshot.
    pub async fn snapshot(&self) -> SignIn {
        self.current.lock().await.clone()
    }

    /// Next step for the latest snapshot.
    pub async fn next_step(&self) -> Result<Step> {
        let current = self.current.lock().await;
        orchestrator::next_step(&current)
    }

    /// First factors other than `current`, in server order.
    pub async fn alternative_first_factors(&self, current: Option<&Factor>) -> Vec<Factor> {
        let snapshot = self.current.lock().await;
        orchestrator::alternative_factors(current, snapshot.first_factors())
    }

    /// Second factors other than `current`, in server order.
    pub async fn alternative_second_factors(&self, current: Option<&Factor>) -> Vec<Factor> {
        let snapshot = self.current.lock().await;
        orchestrator::alternative_factors(current, snapshot.second_factors())
    }

    pub async fn prepare_first_factor(&self, params: &FirstFactorPrepareParams) -> Result<SignIn> {
        let mut current = self.current.lock().await;
        let next = self.api.prepare_first_factor(&current.id, params).await?;
        *current = next.clone();
        Ok(next)
    }

    pub async fn attempt_first_factor(&self, params: &FirstFactorAttemptParams) -> Result<SignIn> {
        let mut current = self.current.lock().await;
        let next = self.api.attempt_first_factor(&current.id, params).await?;
        *current = next.clone();
        Ok(next)
    }

    pub async fn prepare_second_factor(
        &self,
        params: &SecondFactorPrepareParams,
    ) -> Result<SignIn> {
        let mut current = self.current.lock().await;
        let next = self.api.prepare_second_factor(&current.id, params).await?;
        *current = next.clone();
        Ok(next)
    }

    pub async fn attempt_second_factor(
        &self,
        params: &SecondFactorAttemptParams,
    ) -> Result<SignIn> {
        let mut current = self.current.lock().await;
        let next = self.api.attempt_second_factor(&current.id, params).await?;
        *current = next.clone();
        Ok(next)
    }

    pub async fn reset_password(
        &self,
        password: &str,
        sign_out_of_other_sessions: bool,
    ) -> Result<SignIn> {
        let mut current = self.current.lock().await;
        let next = self
            .api
            .reset_password(&current.id, password, sign_out_of_other_sessions)
            .await?;
        *current = next.clone();
        Ok(next)
    }

    /// Re-fetch the snapshot, optionally consuming a rotation nonce.
    pub async fn reload(&self, nonce: Option<&str>) -> Result<SignIn> {
        let mut current = self.current.lock().await;
        let next = self.api.get_sign_in(&current.id, nonce).await?;
        *current = next.clone();
        Ok(next)
    }

    /// Transfer-flow resolution over the latest snapshot: create the
    /// opposite attempt kind when an external identity did not match an
    /// account.
    pub async fn resolve_transfer(&self) -> Result<TransferFlowResult> {
        let current = self.current.lock().await;
        orchestrator::resolve_transfer(&self.api, &current).await
    }
}

/// A sign-up attempt with serialized snapshot replacement.
pub struct SignUpSession {
    api: ApiClient,
    current: Mutex<SignUp>,
}

impl SignUpSession {
    pub async fn create(api: ApiClient, params: &SignUpCreateParams) -> Result<Self> {
        let sign_up = api.create_sign_up(params).await?;
        debug!(sign_up_id = %sign_up.id, "sign-up attempt created");
        Ok(Self {
            api,
            current: Mutex::new(sign_up),
        })
    }

    pub fn from_snapshot(api: ApiClient, sign_up: SignUp) -> Self {
        Self {
            api,
            current: Mutex::new(sign_up),
        }
    }

    pub async fn snapshot(&self) -> SignUp {
        self.current.lock().await.clone()
    }

    pub async fn prepare_verification(
        &self,
        params: &SignUpPrepareVerificationParams,
    ) -> Result<SignUp> {
        let mut current = self.current.lock().await;
        let next = self
            .api
            .prepare_sign_up_verification(&current.id, params)
            .await?;
        *current = next.clone();
        Ok(next)
    }

    pub async fn attempt_verification(
        &self,
        params: &SignUpAttemptVerificationParams,
    ) -> Result<SignUp> {
        let mut current = self.current.lock().await;
        let next = self
            .api
            .attempt_sign_up_verification(&current.id, params)
            .await?;
        *current = next.clone();
        Ok(next)
    }

    pub async fn reload(&self, nonce: Option<&str>) -> Result<SignUp> {
        let mut current = self.current.lock().await;
        let next = self.api.get_sign_up(&current.id, nonce).await?;
        *current = next.clone();
        Ok(next)
    }

    /// Transfer-flow resolution over the latest snapshot.
    pub async fn resolve_transfer(&self) -> Result<TransferFlowResult> {
        let current = self.current.lock().await;
        orchestrator::resolve_sign_up_transfer(&self.api, &current).await
    }
}
