//! Send password-reset code action

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::info;

use crate::domains::auth::error::PasswordResetError;
use crate::domains::auth::models::PasswordResetTicket;
use crate::domains::auth::otp::{generate_code, hash_code, CODE_TTL_MINUTES};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendPasswordOtpRequest {
    pub email: Option<String>,
}

/// Email a fresh reset code to the account owner.
///
/// Any earlier ticket for the account is replaced, so only the newest code works.
pub async fn send_password_otp(
    request: SendPasswordOtpRequest,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<(), PasswordResetError> {
    let email = valid_email(request.email.as_deref())?;

    let account = deps
        .accounts
        .find_by_email(email)
        .await?
        .ok_or_else(|| PasswordResetError::NotFound("No account found for this email".into()))?;

    let code = generate_code();
    deps.store
        .save_reset_ticket(PasswordResetTicket {
            user_id: account.uid.clone(),
            email: email.to_string(),
            hash: hash_code(&code),
            expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
            attempts: 0,
        })
        .await?;

    deps.mailer
        .send(
            email,
            "Your Spark password reset code",
            &format!(
                "Your password reset code is {}.\n\nIt expires in {} minutes. \
                 If you did not ask to reset your password you can ignore this email.",
                code, CODE_TTL_MINUTES
            ),
        )
        .await?;

    info!(uid = %account.uid, "Password reset code sent");
    Ok(())
}

pub(super) fn valid_email(email: Option<&str>) -> Result<&str, PasswordResetError> {
    match email.map(str::trim) {
        Some(e) if !e.is_empty() && e.contains('@') => Ok(e),
        _ => Err(PasswordResetError::InvalidArgument(
            "A valid email is required".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::otp::verify_code;
    use crate::kernel::test_dependencies::MockAccounts;
    use crate::kernel::TestDependencies;

    #[tokio::test]
    async fn test_stores_hash_and_emails_code() {
        let test = TestDependencies::new()
            .with_accounts(MockAccounts::new().with_account("u1", "ana@example.com"));
        let now = Utc::now();

        send_password_otp(
            SendPasswordOtpRequest {
                email: Some("ana@example.com".into()),
            },
            now,
            &test.server_deps(),
        )
        .await
        .unwrap();

        let ticket = test.store.ticket("u1").unwrap();
        assert_eq!(ticket.attempts, 0);
        assert_eq!(ticket.expires_at, now + Duration::minutes(10));

        let mail = &test.mailer.sent()[0];
        assert_eq!(mail.to, "ana@example.com");
        let code: String = mail.body.chars().filter(|c| c.is_ascii_digit()).take(6).collect();
        assert!(verify_code(&code, &ticket.hash));
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let test = TestDependencies::new();
        let err = send_password_otp(
            SendPasswordOtpRequest {
                email: Some("nobody@example.com".into()),
            },
            Utc::now(),
            &test.server_deps(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code(), "not-found");
        assert!(test.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_missing_email_is_invalid() {
        let test = TestDependencies::new();
        let err = send_password_otp(SendPasswordOtpRequest::default(), Utc::now(), &test.server_deps())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid-argument");
    }
}
