use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Student document
///
/// The only fields this service touches: the push token (cleared when FCM
/// reports it dead) and the set of followed companies (read for fan-out).
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default)]
    pub id: String,
    pub fcm_token: Option<String>,
    #[serde(default)]
    pub followed_companies: Vec<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Student {
    /// Find student by ID
    pub async fn find_by_id(id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, fcm_token, followed_companies FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Find every student whose followed companies include `company_id`
    pub async fn find_following(company_id: &str, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, fcm_token, followed_companies FROM students
             WHERE $1 = ANY(followed_companies)
             ORDER BY id",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Remove the push token (FCM reported it unregistered or malformed)
    pub async fn clear_fcm_token(id: &str, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE students SET fcm_token = NULL WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Push token, ignoring empty strings left behind by clients
    pub fn push_token(&self) -> Option<&str> {
        self.fcm_token.as_deref().filter(|t| !t.is_empty())
    }
}
