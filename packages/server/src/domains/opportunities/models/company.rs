use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub id: String,
    pub company_name: Option<String>,
}

impl Company {
    pub async fn find_by_id(id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT id, company_name FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Display name, or `fallback` when the company left it blank
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.company_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback)
    }
}
