//! Orchestration state machine
//!
//! Pure functions over attempt snapshots: status-to-next-step mapping,
//! factor identification, alternative-factor enumeration, and the
//! transfer predicate — plus the one impure operation in the family,
//! transfer-flow resolution, which issues a fresh create on the opposite
//! attempt kind.
//!
//! None of this computes authentication decisions. The server decides;
//! these functions only read the snapshot it returned.

use tracing::{info, warn};

use latch_model::{
    Factor, SignIn, SignInStatus, SignInCreateParams, SignUp, SignUpCreateParams, Strategy,
    TransferFlowResult,
};

use crate::error::{Error, Result};
use crate::transport::ApiClient;

/// What the caller should do next with a sign-in attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    CollectIdentifier,
    CollectFirstFactor(Factor),
    CollectSecondFactor(Factor),
    CollectNewPassword,
    /// Device-trust verification; reuses the code-entry UI for the factor
    CollectClientTrust(Factor),
    /// Terminal success; carries the created session id
    Done(String),
    /// The server declared a status this client does not know; carries the
    /// raw status string so the caller can surface a generic recovery path
    UnknownTerminal(String),
    /// The server declared a strategy the client cannot resolve to a
    /// concrete channel. A genuine dead end, not an error.
    GetHelp,
}

/// Map a snapshot to the next step.
///
/// The only error path is `Complete` with no session id, which is a
/// client/server contract violation rather than user-facing state.
pub fn next_step(sign_in: &SignIn) -> Result<Step> {
    match &sign_in.status {
        SignInStatus::NeedsIdentifier => Ok(Step::CollectIdentifier),
        SignInStatus::NeedsFirstFactor => Ok(route_factor(
            sign_in,
            sign_in.first_factors(),
            sign_in
                .first_factor_verification
                .as_ref()
                .and_then(|v| v.strategy.as_ref()),
            Step::CollectFirstFactor,
        )),
        SignInStatus::NeedsSecondFactor => Ok(route_factor(
            sign_in,
            sign_in.second_factors(),
            sign_in
                .second_factor_verification
                .as_ref()
                .and_then(|v| v.strategy.as_ref()),
            Step::CollectSecondFactor,
        )),
        SignInStatus::NeedsNewPassword => Ok(Step::CollectNewPassword),
        // Client trust is routed by the *first-factor* verification's
        // strategy regardless of tier.
        SignInStatus::NeedsClientTrust => Ok(route_factor(
            sign_in,
            sign_in.first_factors(),
            sign_in
                .first_factor_verification
                .as_ref()
                .and_then(|v| v.strategy.as_ref()),
            Step::CollectClientTrust,
        )),
        SignInStatus::Complete => match &sign_in.created_session_id {
            Some(session_id) => Ok(Step::Done(session_id.clone())),
            None => Err(Error::Invariant(format!(
                "sign-in {} is complete but has no created session id",
                sign_in.id
            ))),
        },
        SignInStatus::Unknown(raw) => Ok(Step::UnknownTerminal(raw.clone())),
    }
}

/// Resolve which factor the active verification refers to, and wrap it in
/// the given step constructor; `GetHelp` when nothing resolves.
fn route_factor(
    sign_in: &SignIn,
    factors: &[Factor],
    active_strategy: Option<&Strategy>,
    step: impl FnOnce(Factor) -> Step,
) -> Step {
    let identifier = sign_in.identifier.as_deref();

    let routed = match active_strategy {
        Some(strategy) => identifying_factor(strategy, factors, identifier),
        // No verification is active yet; start with the factor bound to
        // the identifier the user signed in with.
        None => factors
            .iter()
            .find(|f| f.safe_identifier.as_deref() == identifier),
    };

    match routed {
        Some(factor) => step(factor.clone()),
        None => {
            warn!(
                sign_in_id = %sign_in.id,
                strategy = active_strategy.map(|s| s.wire()).as_deref().unwrap_or("<none>"),
                "no factor resolves the active strategy"
            );
            Step::GetHelp
        }
    }
}

/// The first factor offering `strategy` for the attempt's identifier.
///
/// First match wins; the server-provided order is authoritative.
pub fn identifying_factor<'a>(
    strategy: &Strategy,
    factors: &'a [Factor],
    identifier: Option<&str>,
) -> Option<&'a Factor> {
    factors
        .iter()
        .find(|f| f.strategy == *strategy && f.safe_identifier.as_deref() == identifier)
}

/// All factors except the one currently in use.
///
/// Exclusion is by full factor equality (strategy and identifiers), so two
/// email-code factors bound to different addresses stay distinct. Total:
/// `current == None` returns the list unchanged. Order is preserved.
pub fn alternative_factors(current: Option<&Factor>, all: &[Factor]) -> Vec<Factor> {
    all.iter()
        .filter(|f| Some(*f) != current)
        .cloned()
        .collect()
}

/// Whether either tier's verification signals "valid external identity,
/// no matching account for this operation".
pub fn needs_transfer(sign_in: &SignIn) -> bool {
    sign_in
        .first_factor_verification
        .as_ref()
        .is_some_and(|v| v.is_transferable())
        || sign_in
            .second_factor_verification
            .as_ref()
            .is_some_and(|v| v.is_transferable())
}

/// Sign-up analogue of [`needs_transfer`]: any field-keyed verification
/// (in practice `external_account`) is transferable.
pub fn sign_up_needs_transfer(sign_up: &SignUp) -> bool {
    sign_up.verifications.values().any(|v| v.is_transferable())
}

/// First offered factor from the reset-password family, if any.
pub fn reset_password_factor(sign_in: &SignIn) -> Option<&Factor> {
    sign_in
        .first_factors()
        .iter()
        .find(|f| f.strategy.is_reset_password())
}

/// Apply transfer-flow resolution to a sign-in snapshot.
///
/// When the transfer predicate holds, the normal next-step path must not
/// continue; instead a *new* sign-up attempt is created with the bare
/// `transfer` strategy, which reuses the identity linkage the prior
/// external-auth attempt established server-side.
pub async fn resolve_transfer(api: &ApiClient, sign_in: &SignIn) -> Result<TransferFlowResult> {
    if needs_transfer(sign_in) {
        info!(sign_in_id = %sign_in.id, "external identity has no account, transferring to sign-up");
        let sign_up = api.create_sign_up(&SignUpCreateParams::Transfer).await?;
        return Ok(TransferFlowResult::SignUp(sign_up));
    }
    Ok(TransferFlowResult::SignIn(sign_in.clone()))
}

/// Apply transfer-flow resolution to a sign-up snapshot (opposite
/// direction: the external identity already has an account).
pub async fn resolve_sign_up_transfer(
    api: &ApiClient,
    sign_up: &SignUp,
) -> Result<TransferFlowResult> {
    if sign_up_needs_transfer(sign_up) {
        info!(sign_up_id = %sign_up.id, "external identity already has an account, transferring to sign-in");
        let sign_in = api.create_sign_in(&SignInCreateParams::Transfer).await?;
        return Ok(TransferFlowResult::SignIn(sign_in));
    }
    Ok(TransferFlowResult::SignUp(sign_up.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use latch_model::{Verification, VerificationStatus};

    fn email_factor(safe: &str, id: &str) -> Factor {
        Factor {
            strategy: Strategy::EmailCode,
            safe_identifier: Some(safe.into()),
            email_address_id: Some(id.into()),
            phone_number_id: None,
        }
    }

    fn verification(strategy: Strategy, status: VerificationStatus) -> Verification {
        Verification {
            status,
            strategy: Some(strategy),
            attempts: None,
            expire_at: None,
            error: None,
        }
    }

    fn base_sign_in(status: SignInStatus) -> SignIn {
        SignIn {
            id: "sia_1".into(),
            status,
            identifier: Some("user@example.com".into()),
            supported_first_factors: None,
            supported_second_factors: None,
            first_factor_verification: None,
            second_factor_verification: None,
            created_session_id: None,
        }
    }

    #[test]
    fn needs_identifier_collects_identifier() {
        let sign_in = base_sign_in(SignInStatus::NeedsIdentifier);
        assert_eq!(next_step(&sign_in).unwrap(), Step::CollectIdentifier);
    }

    #[test]
    fn complete_yields_done_with_session_id() {
        let mut sign_in = base_sign_in(SignInStatus::Complete);
        sign_in.created_session_id = Some("sess_1".into());
        assert_eq!(next_step(&sign_in).unwrap(), Step::Done("sess_1".into()));
    }

    #[test]
    fn complete_without_session_id_is_invariant_violation() {
        let sign_in = base_sign_in(SignInStatus::Complete);
        let err = next_step(&sign_in).unwrap_err();
        assert!(matches!(err, Error::Invariant(_)), "got: {err:?}");
    }

    #[test]
    fn unknown_status_is_never_a_crash() {
        let sign_in = base_sign_in(SignInStatus::Unknown("needs_quantum_proof".into()));
        assert_eq!(
            next_step(&sign_in).unwrap(),
            Step::UnknownTerminal("needs_quantum_proof".into())
        );
    }

    #[test]
    fn first_factor_routes_by_strategy_and_identifier() {
        // Two email-code factors; the verification strategy alone is
        // ambiguous, the identifier disambiguates to the second one.
        let a = email_factor("a***@example.com", "eml_1");
        let b = email_factor("user@example.com", "eml_2");
        let mut sign_in = base_sign_in(SignInStatus::NeedsFirstFactor);
        sign_in.supported_first_factors = Some(vec![a, b.clone()]);
        sign_in.first_factor_verification = Some(verification(
            Strategy::EmailCode,
            VerificationStatus::Unverified,
        ));

        assert_eq!(next_step(&sign_in).unwrap(), Step::CollectFirstFactor(b));
    }

    #[test]
    fn first_factor_without_verification_uses_identifier_bound_factor() {
        let password = Factor {
            strategy: Strategy::Password,
            safe_identifier: Some("user@example.com".into()),
            email_address_id: None,
            phone_number_id: None,
        };
        let mut sign_in = base_sign_in(SignInStatus::NeedsFirstFactor);
        sign_in.supported_first_factors = Some(vec![password.clone()]);

        assert_eq!(
            next_step(&sign_in).unwrap(),
            Step::CollectFirstFactor(password)
        );
    }

    #[test]
    fn unresolvable_strategy_is_get_help_not_error() {
        let mut sign_in = base_sign_in(SignInStatus::NeedsFirstFactor);
        sign_in.supported_first_factors = Some(vec![email_factor("user@example.com", "eml_1")]);
        // Server declared phone_code but offers no phone factor
        sign_in.first_factor_verification = Some(verification(
            Strategy::PhoneCode,
            VerificationStatus::Unverified,
        ));

        assert_eq!(next_step(&sign_in).unwrap(), Step::GetHelp);
    }

    #[test]
    fn second_factor_routes_against_second_factor_list() {
        let totp = Factor {
            strategy: Strategy::Totp,
            safe_identifier: None,
            email_address_id: None,
            phone_number_id: None,
        };
        let mut sign_in = base_sign_in(SignInStatus::NeedsSecondFactor);
        sign_in.identifier = None;
        sign_in.supported_second_factors = Some(vec![totp.clone()]);
        sign_in.second_factor_verification =
            Some(verification(Strategy::Totp, VerificationStatus::Unverified));

        assert_eq!(next_step(&sign_in).unwrap(), Step::CollectSecondFactor(totp));
    }

    #[test]
    fn client_trust_routes_by_first_factor_verification() {
        let factor = email_factor("user@example.com", "eml_1");
        let mut sign_in = base_sign_in(SignInStatus::NeedsClientTrust);
        sign_in.supported_first_factors = Some(vec![factor.clone()]);
        sign_in.first_factor_verification = Some(verification(
            Strategy::EmailCode,
            VerificationStatus::Unverified,
        ));

        assert_eq!(
            next_step(&sign_in).unwrap(),
            Step::CollectClientTrust(factor)
        );
    }

    #[test]
    fn needs_new_password_collects_new_password() {
        let sign_in = base_sign_in(SignInStatus::NeedsNewPassword);
        assert_eq!(next_step(&sign_in).unwrap(), Step::CollectNewPassword);
    }

    #[test]
    fn identifying_factor_first_match_wins() {
        let a = email_factor("e1@example.com", "eml_1");
        let b = email_factor("e2@example.com", "eml_2");
        let factors = vec![a, b.clone()];

        let found =
            identifying_factor(&Strategy::EmailCode, &factors, Some("e2@example.com")).unwrap();
        assert_eq!(*found, b);

        assert!(identifying_factor(&Strategy::EmailCode, &factors, Some("nope")).is_none());
        assert!(identifying_factor(&Strategy::PhoneCode, &factors, Some("e1@example.com")).is_none());
    }

    #[test]
    fn alternatives_exclude_current_and_preserve_order() {
        let a = email_factor("e1@example.com", "eml_1");
        let b = email_factor("e2@example.com", "eml_2");
        let all = vec![a.clone(), b.clone()];

        assert_eq!(alternative_factors(Some(&b), &all), vec![a.clone()]);
        assert_eq!(alternative_factors(None, &all), all);
    }

    #[test]
    fn transfer_predicate_truth_table() {
        let mut sign_in = base_sign_in(SignInStatus::NeedsFirstFactor);
        assert!(!needs_transfer(&sign_in));

        sign_in.first_factor_verification = Some(verification(
            Strategy::Oauth("google".into()),
            VerificationStatus::Verified,
        ));
        assert!(!needs_transfer(&sign_in));

        sign_in.first_factor_verification = Some(verification(
            Strategy::Oauth("google".into()),
            VerificationStatus::Transferable,
        ));
        assert!(needs_transfer(&sign_in));

        sign_in.first_factor_verification = None;
        sign_in.second_factor_verification = Some(verification(
            Strategy::EnterpriseSso,
            VerificationStatus::Transferable,
        ));
        assert!(needs_transfer(&sign_in));
    }

    #[test]
    fn reset_password_factor_finds_reset_family() {
        let mut sign_in = base_sign_in(SignInStatus::NeedsFirstFactor);
        sign_in.supported_first_factors = Some(vec![
            email_factor("user@example.com", "eml_1"),
            Factor {
                strategy: Strategy::ResetPasswordEmailCode,
                safe_identifier: Some("user@example.com".into()),
                email_address_id: Some("eml_1".into()),
                phone_number_id: None,
            },
        ]);

        let factor = reset_password_factor(&sign_in).unwrap();
        assert_eq!(factor.strategy, Strategy::ResetPasswordEmailCode);

        sign_in.supported_first_factors = None;
        assert!(reset_password_factor(&sign_in).is_none());
    }
}
