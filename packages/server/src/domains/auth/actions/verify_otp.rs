//! Verify password-reset code action

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::send_otp::valid_email;
use crate::domains::auth::error::PasswordResetError;
use crate::domains::auth::otp::{verify_code, MAX_ATTEMPTS};
use crate::kernel::ServerDeps;

const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPasswordOtpRequest {
    pub email: Option<String>,
    pub code: Option<String>,
    pub new_password: Option<String>,
}

/// Check the code and, when it matches, replace the account password.
///
/// Order matters: expiry and the attempt cap are checked before the code,
/// so a burned ticket cannot be rescued by a correct guess.
pub async fn verify_password_otp(
    request: VerifyPasswordOtpRequest,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<(), PasswordResetError> {
    let email = valid_email(request.email.as_deref())?;
    let code = request
        .code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| PasswordResetError::InvalidArgument("Reset code is required".into()))?;
    let new_password = request
        .new_password
        .as_deref()
        .filter(|p| p.chars().count() >= MIN_PASSWORD_CHARS)
        .ok_or_else(|| {
            PasswordResetError::InvalidArgument(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_CHARS
            ))
        })?;

    let account = deps
        .accounts
        .find_by_email(email)
        .await?
        .ok_or_else(|| PasswordResetError::NotFound("No account found for this email".into()))?;

    let Some(ticket) = deps.store.find_reset_ticket(&account.uid).await? else {
        return Err(PasswordResetError::NotFound(
            "No reset code was requested for this account".into(),
        ));
    };

    if ticket.is_expired(now) {
        deps.store.delete_reset_ticket(&account.uid).await?;
        return Err(PasswordResetError::Expired);
    }

    if ticket.attempts >= MAX_ATTEMPTS {
        deps.store.delete_reset_ticket(&account.uid).await?;
        return Err(PasswordResetError::TooManyAttempts);
    }

    if !verify_code(code, &ticket.hash) {
        deps.store.record_failed_attempt(&account.uid).await?;
        warn!(uid = %account.uid, attempts = ticket.attempts + 1, "Wrong password reset code");
        return Err(PasswordResetError::InvalidCode);
    }

    deps.accounts.update_password(&account.uid, new_password).await?;
    deps.store.delete_reset_ticket(&account.uid).await?;

    info!(uid = %account.uid, "Password reset completed");
    Ok(())
}
