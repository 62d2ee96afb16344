use anyhow::Result;
use sqlx::PgPool;

/// Sign-in account; only email lookup and credential replacement are needed here
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub uid: String,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

impl Account {
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT uid, email, password_hash FROM accounts WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update_password_hash(uid: &str, password_hash: &str, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE accounts SET password_hash = $2, updated_at = NOW() WHERE uid = $1")
            .bind(uid)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(())
    }
}
