//! Strategy taxonomy per orchestration phase
//!
//! Each phase (create, prepare/attempt first factor, prepare/attempt
//! second factor, sign-up verification) has its own closed union; each
//! variant carries exactly the parameters that strategy requires.
//! `to_wire_params()` produces the literal form fields the transport
//! layer sends, including the `strategy` key.
//!
//! Constructing a value never fails; only sending it can (server-side
//! validation). Redirect-based variants with no explicit `redirect_url`
//! resolve the process-wide default at `to_wire_params()` time, so
//! reconfiguration between construction and submission is honored.

use crate::strategy::Strategy;

/// Form fields for one orchestration call.
pub type WireParams = Vec<(String, String)>;

fn pair(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_owned(), value.into())
}

/// Explicit redirect URL, or the process-wide default. Resolved late.
fn resolved_redirect(explicit: Option<&String>) -> String {
    explicit
        .cloned()
        .unwrap_or_else(|| common::current().redirect_url)
}

/// Strategies legal when creating a sign-in attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SignInCreateParams {
    /// Identify by email/phone/username; optionally verify the password
    /// in the same call.
    Identifier {
        identifier: String,
        password: Option<String>,
    },
    Oauth {
        provider: String,
        redirect_url: Option<String>,
    },
    EnterpriseSso {
        identifier: String,
        redirect_url: Option<String>,
    },
    Passkey,
    /// Sign-in token minted out of band (invitations, impersonation)
    Ticket(String),
    /// Reuse the identity linkage of a prior external-auth sign-up attempt
    Transfer,
}

impl SignInCreateParams {
    pub fn to_wire_params(&self) -> WireParams {
        match self {
            SignInCreateParams::Identifier {
                identifier,
                password,
            } => {
                let mut params = vec![pair("identifier", identifier)];
                if let Some(password) = password {
                    params.push(pair("strategy", Strategy::Password.wire()));
                    params.push(pair("password", password));
                }
                params
            }
            SignInCreateParams::Oauth {
                provider,
                redirect_url,
            } => vec![
                pair("strategy", Strategy::Oauth(provider.clone()).wire()),
                pair("redirect_url", resolved_redirect(redirect_url.as_ref())),
            ],
            SignInCreateParams::EnterpriseSso {
                identifier,
                redirect_url,
            } => vec![
                pair("strategy", Strategy::EnterpriseSso.wire()),
                pair("identifier", identifier),
                pair("redirect_url", resolved_redirect(redirect_url.as_ref())),
            ],
            SignInCreateParams::Passkey => vec![pair("strategy", Strategy::Passkey.wire())],
            SignInCreateParams::Ticket(ticket) => vec![
                pair("strategy", Strategy::Ticket.wire()),
                pair("ticket", ticket),
            ],
            SignInCreateParams::Transfer => vec![pair("strategy", Strategy::Transfer.wire())],
        }
    }
}

/// Strategies legal when preparing a first factor.
#[derive(Debug, Clone, PartialEq)]
pub enum FirstFactorPrepareParams {
    EmailCode {
        email_address_id: Option<String>,
    },
    PhoneCode {
        phone_number_id: Option<String>,
    },
    Oauth {
        provider: String,
        redirect_url: Option<String>,
    },
    EnterpriseSso {
        redirect_url: Option<String>,
    },
    Passkey,
    ResetPasswordEmailCode {
        email_address_id: Option<String>,
    },
    ResetPasswordPhoneCode {
        phone_number_id: Option<String>,
    },
}

impl FirstFactorPrepareParams {
    pub fn to_wire_params(&self) -> WireParams {
        match self {
            FirstFactorPrepareParams::EmailCode { email_address_id } => {
                with_channel(Strategy::EmailCode, "email_address_id", email_address_id)
            }
            FirstFactorPrepareParams::PhoneCode { phone_number_id } => {
                with_channel(Strategy::PhoneCode, "phone_number_id", phone_number_id)
            }
            FirstFactorPrepareParams::Oauth {
                provider,
                redirect_url,
            } => vec![
                pair("strategy", Strategy::Oauth(provider.clone()).wire()),
                pair("redirect_url", resolved_redirect(redirect_url.as_ref())),
            ],
            FirstFactorPrepareParams::EnterpriseSso { redirect_url } => vec![
                pair("strategy", Strategy::EnterpriseSso.wire()),
                pair("redirect_url", resolved_redirect(redirect_url.as_ref())),
            ],
            FirstFactorPrepareParams::Passkey => vec![pair("strategy", Strategy::Passkey.wire())],
            FirstFactorPrepareParams::ResetPasswordEmailCode { email_address_id } => with_channel(
                Strategy::ResetPasswordEmailCode,
                "email_address_id",
                email_address_id,
            ),
            FirstFactorPrepareParams::ResetPasswordPhoneCode { phone_number_id } => with_channel(
                Strategy::ResetPasswordPhoneCode,
                "phone_number_id",
                phone_number_id,
            ),
        }
    }
}

fn with_channel(strategy: Strategy, key: &str, channel_id: &Option<String>) -> WireParams {
    let mut params = vec![pair("strategy", strategy.wire())];
    if let Some(id) = channel_id {
        params.push(pair(key, id));
    }
    params
}

/// Strategies legal when attempting a first factor.
#[derive(Debug, Clone, PartialEq)]
pub enum FirstFactorAttemptParams {
    Password(String),
    EmailCode(String),
    PhoneCode(String),
    /// Serialized WebAuthn credential, passed opaquely
    Passkey { public_key_credential: String },
    ResetPasswordEmailCode(String),
    ResetPasswordPhoneCode(String),
}

impl FirstFactorAttemptParams {
    pub fn to_wire_params(&self) -> WireParams {
        match self {
            FirstFactorAttemptParams::Password(password) => vec![
                pair("strategy", Strategy::Password.wire()),
                pair("password", password),
            ],
            FirstFactorAttemptParams::EmailCode(code) => {
                with_code(Strategy::EmailCode, code)
            }
            FirstFactorAttemptParams::PhoneCode(code) => {
                with_code(Strategy::PhoneCode, code)
            }
            FirstFactorAttemptParams::Passkey {
                public_key_credential,
            } => vec![
                pair("strategy", Strategy::Passkey.wire()),
                pair("public_key_credential", public_key_credential),
            ],
            FirstFactorAttemptParams::ResetPasswordEmailCode(code) => {
                with_code(Strategy::ResetPasswordEmailCode, code)
            }
            FirstFactorAttemptParams::ResetPasswordPhoneCode(code) => {
                with_code(Strategy::ResetPasswordPhoneCode, code)
            }
        }
    }
}

fn with_code(strategy: Strategy, code: &str) -> WireParams {
    vec![pair("strategy", strategy.wire()), pair("code", code)]
}

/// Strategies legal when preparing a second factor.
#[derive(Debug, Clone, PartialEq)]
pub enum SecondFactorPrepareParams {
    PhoneCode { phone_number_id: Option<String> },
    EmailCode { email_address_id: Option<String> },
}

impl SecondFactorPrepareParams {
    pub fn to_wire_params(&self) -> WireParams {
        match self {
            SecondFactorPrepareParams::PhoneCode { phone_number_id } => {
                with_channel(Strategy::PhoneCode, "phone_number_id", phone_number_id)
            }
            SecondFactorPrepareParams::EmailCode { email_address_id } => {
                with_channel(Strategy::EmailCode, "email_address_id", email_address_id)
            }
        }
    }
}

/// Strategies legal when attempting a second factor.
#[derive(Debug, Clone, PartialEq)]
pub enum SecondFactorAttemptParams {
    Totp(String),
    PhoneCode(String),
    BackupCode(String),
    EmailCode(String),
}

impl SecondFactorAttemptParams {
    pub fn to_wire_params(&self) -> WireParams {
        match self {
            SecondFactorAttemptParams::Totp(code) => with_code(Strategy::Totp, code),
            SecondFactorAttemptParams::PhoneCode(code) => with_code(Strategy::PhoneCode, code),
            SecondFactorAttemptParams::BackupCode(code) => with_code(Strategy::BackupCode, code),
            SecondFactorAttemptParams::EmailCode(code) => with_code(Strategy::EmailCode, code),
        }
    }
}

/// Strategies legal when creating a sign-up attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpCreateParams {
    /// Collect fields directly; all optional, validated server-side
    Standard {
        email_address: Option<String>,
        phone_number: Option<String>,
        username: Option<String>,
        password: Option<String>,
    },
    Oauth {
        provider: String,
        redirect_url: Option<String>,
    },
    EnterpriseSso {
        identifier: Option<String>,
        redirect_url: Option<String>,
    },
    Ticket(String),
    /// Reuse the identity linkage of a prior external-auth sign-in attempt
    Transfer,
}

impl SignUpCreateParams {
    pub fn to_wire_params(&self) -> WireParams {
        match self {
            SignUpCreateParams::Standard {
                email_address,
                phone_number,
                username,
                password,
            } => {
                let mut params = WireParams::new();
                if let Some(v) = email_address {
                    params.push(pair("email_address", v));
                }
                if let Some(v) = phone_number {
                    params.push(pair("phone_number", v));
                }
                if let Some(v) = username {
                    params.push(pair("username", v));
                }
                if let Some(v) = password {
                    params.push(pair("password", v));
                }
                params
            }
            SignUpCreateParams::Oauth {
                provider,
                redirect_url,
            } => vec![
                pair("strategy", Strategy::Oauth(provider.clone()).wire()),
                pair("redirect_url", resolved_redirect(redirect_url.as_ref())),
            ],
            SignUpCreateParams::EnterpriseSso {
                identifier,
                redirect_url,
            } => {
                let mut params = vec![
                    pair("strategy", Strategy::EnterpriseSso.wire()),
                    pair("redirect_url", resolved_redirect(redirect_url.as_ref())),
                ];
                if let Some(identifier) = identifier {
                    params.push(pair("identifier", identifier));
                }
                params
            }
            SignUpCreateParams::Ticket(ticket) => vec![
                pair("strategy", Strategy::Ticket.wire()),
                pair("ticket", ticket),
            ],
            SignUpCreateParams::Transfer => vec![pair("strategy", Strategy::Transfer.wire())],
        }
    }
}

/// Strategies legal when preparing a sign-up field verification.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpPrepareVerificationParams {
    EmailCode,
    PhoneCode,
}

impl SignUpPrepareVerificationParams {
    pub fn to_wire_params(&self) -> WireParams {
        match self {
            SignUpPrepareVerificationParams::EmailCode => {
                vec![pair("strategy", Strategy::EmailCode.wire())]
            }
            SignUpPrepareVerificationParams::PhoneCode => {
                vec![pair("strategy", Strategy::PhoneCode.wire())]
            }
        }
    }
}

/// Strategies legal when attempting a sign-up field verification.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpAttemptVerificationParams {
    EmailCode(String),
    PhoneCode(String),
}

impl SignUpAttemptVerificationParams {
    pub fn to_wire_params(&self) -> WireParams {
        match self {
            SignUpAttemptVerificationParams::EmailCode(code) => {
                with_code(Strategy::EmailCode, code)
            }
            SignUpAttemptVerificationParams::PhoneCode(code) => {
                with_code(Strategy::PhoneCode, code)
            }
        }
    }
}
