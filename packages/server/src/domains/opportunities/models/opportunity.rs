use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Opportunity (job/internship posting) created by a company
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    #[serde(default)]
    pub id: String,
    pub company_id: Option<String>,
    pub role: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: bool,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Opportunity {
    pub async fn find_by_id(id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, company_id, role, application_deadline, is_active
             FROM opportunities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Active opportunities whose deadline falls in `[from, to)`
    pub async fn find_active_with_deadline_between(
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, company_id, role, application_deadline, is_active
             FROM opportunities
             WHERE application_deadline >= $1
               AND application_deadline < $2
               AND is_active = true
             ORDER BY application_deadline",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Role title, or `fallback` when missing
    pub fn role_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.role
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(fallback)
    }
}
