use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Outstanding password-reset code for one user
///
/// Only the salted hash of the code is kept (`salt$hex`).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PasswordResetTicket {
    pub user_id: String,
    pub email: String,
    pub hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl PasswordResetTicket {
    pub async fn find_by_user(user_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT user_id, email, hash, expires_at, attempts
             FROM password_reset_tickets WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Store the ticket, replacing any earlier one for the same user
    pub async fn upsert(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO password_reset_tickets (user_id, email, hash, expires_at, attempts)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id) DO UPDATE SET
                email = EXCLUDED.email,
                hash = EXCLUDED.hash,
                expires_at = EXCLUDED.expires_at,
                attempts = EXCLUDED.attempts,
                created_at = NOW()",
        )
        .bind(&self.user_id)
        .bind(&self.email)
        .bind(&self.hash)
        .bind(self.expires_at)
        .bind(self.attempts)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn increment_attempts(user_id: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "UPDATE password_reset_tickets SET attempts = attempts + 1 WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn delete(user_id: &str, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM password_reset_tickets WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
