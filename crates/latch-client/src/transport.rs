//! Transport service: one orchestration operation per HTTP call
//!
//! Stateless mapping from operations to endpoints. Every call returns a
//! fresh attempt snapshot; the transport never patches or caches state.
//! Requests are form-encoded POSTs (or plain GETs for reload); successful
//! responses arrive in a `{"response": ...}` envelope, rejections as an
//! `{"errors": [...]}` body which is propagated verbatim.
//!
//! No retry logic lives here or anywhere above: a failed operation is the
//! caller's to re-issue.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use latch_model::{
    FirstFactorAttemptParams, FirstFactorPrepareParams, SecondFactorAttemptParams,
    SecondFactorPrepareParams, SignIn, SignInCreateParams, SignUp,
    SignUpAttemptVerificationParams, SignUpCreateParams, SignUpPrepareVerificationParams,
    WireParams,
};

use crate::error::{Error, Result};

const SIGN_INS_PATH: &str = "/v1/client/sign_ins";
const SIGN_UPS_PATH: &str = "/v1/client/sign_ups";
const NONCE_PARAM: &str = "rotating_token_nonce";

/// Successful response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

/// Stateless client for the backend's attempt endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Wrap an existing HTTP client against the given backend origin.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    /// Build a client from the process-wide configuration.
    pub fn from_config() -> Result<Self> {
        let config = common::current();
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Http(format!("building HTTP client: {e}")))?;
        Ok(Self::new(http, config.api_url))
    }

    // --- Sign-in operations ---

    pub async fn create_sign_in(&self, params: &SignInCreateParams) -> Result<SignIn> {
        self.post(SIGN_INS_PATH.to_owned(), &params.to_wire_params())
            .await
    }

    pub async fn prepare_first_factor(
        &self,
        sign_in_id: &str,
        params: &FirstFactorPrepareParams,
    ) -> Result<SignIn> {
        self.post(
            format!("{SIGN_INS_PATH}/{sign_in_id}/prepare_first_factor"),
            &params.to_wire_params(),
        )
        .await
    }

    pub async fn attempt_first_factor(
        &self,
        sign_in_id: &str,
        params: &FirstFactorAttemptParams,
    ) -> Result<SignIn> {
        self.post(
            format!("{SIGN_INS_PATH}/{sign_in_id}/attempt_first_factor"),
            &params.to_wire_params(),
        )
        .await
    }

    pub async fn prepare_second_factor(
        &self,
        sign_in_id: &str,
        params: &SecondFactorPrepareParams,
    ) -> Result<SignIn> {
        self.post(
            format!("{SIGN_INS_PATH}/{sign_in_id}/prepare_second_factor"),
            &params.to_wire_params(),
        )
        .await
    }

    pub async fn attempt_second_factor(
        &self,
        sign_in_id: &str,
        params: &SecondFactorAttemptParams,
    ) -> Result<SignIn> {
        self.post(
            format!("{SIGN_INS_PATH}/{sign_in_id}/attempt_second_factor"),
            &params.to_wire_params(),
        )
        .await
    }

    pub async fn reset_password(
        &self,
        sign_in_id: &str,
        password: &str,
        sign_out_of_other_sessions: bool,
    ) -> Result<SignIn> {
        let params = vec![
            ("password".to_owned(), password.to_owned()),
            (
                "sign_out_of_other_sessions".to_owned(),
                sign_out_of_other_sessions.to_string(),
            ),
        ];
        self.post(format!("{SIGN_INS_PATH}/{sign_in_id}/reset_password"), &params)
            .await
    }

    /// Reload a sign-in snapshot. The nonce single-use-consumes a rotating
    /// verification token after an external-auth callback.
    pub async fn get_sign_in(&self, sign_in_id: &str, nonce: Option<&str>) -> Result<SignIn> {
        self.get(format!("{SIGN_INS_PATH}/{sign_in_id}"), nonce).await
    }

    // --- Sign-up operations ---

    pub async fn create_sign_up(&self, params: &SignUpCreateParams) -> Result<SignUp> {
        self.post(SIGN_UPS_PATH.to_owned(), &params.to_wire_params())
            .await
    }

    pub async fn prepare_sign_up_verification(
        &self,
        sign_up_id: &str,
        params: &SignUpPrepareVerificationParams,
    ) -> Result<SignUp> {
        self.post(
            format!("{SIGN_UPS_PATH}/{sign_up_id}/prepare_verification"),
            &params.to_wire_params(),
        )
        .await
    }

    pub async fn attempt_sign_up_verification(
        &self,
        sign_up_id: &str,
        params: &SignUpAttemptVerificationParams,
    ) -> Result<SignUp> {
        self.post(
            format!("{SIGN_UPS_PATH}/{sign_up_id}/attempt_verification"),
            &params.to_wire_params(),
        )
        .await
    }

    /// Reload a sign-up snapshot, optionally consuming a rotation nonce.
    pub async fn get_sign_up(&self, sign_up_id: &str, nonce: Option<&str>) -> Result<SignUp> {
        self.get(format!("{SIGN_UPS_PATH}/{sign_up_id}"), nonce).await
    }

    // --- Plumbing ---

    async fn post<T: DeserializeOwned>(&self, path: String, params: &WireParams) -> Result<T> {
        debug!(path = %path, "sending orchestration call");
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .form(params)
            .send()
            .await
            .map_err(|e| Error::Http(format!("POST {path} failed: {e}")))?;
        decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: String, nonce: Option<&str>) -> Result<T> {
        debug!(path = %path, has_nonce = nonce.is_some(), "reloading snapshot");
        let mut request = self.http.get(format!("{}{path}", self.base_url));
        if let Some(nonce) = nonce {
            request = request.query(&[(NONCE_PARAM, nonce)]);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(format!("GET {path} failed: {e}")))?;
        decode(response).await
    }
}

/// Decode a response: envelope on success, structured error otherwise.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Http(format!("reading response body: {e}")))?;

    if status.is_success() {
        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| Error::Response {
                status: status.as_u16(),
                body: format!("invalid response body: {e}"),
            })?;
        return Ok(envelope.response);
    }

    match serde_json::from_str::<latch_model::ApiErrorResponse>(&body)
        .ok()
        .and_then(|r| r.primary())
    {
        Some(api_error) => Err(Error::Api(api_error)),
        None => Err(Error::Response {
            status: status.as_u16(),
            body,
        }),
    }
}
