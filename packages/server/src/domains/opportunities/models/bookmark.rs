use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A student saving an opportunity for later
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(default)]
    pub id: String,
    pub student_id: Option<String>,
    pub opportunity_id: Option<String>,
}

impl Bookmark {
    /// IDs of every student who bookmarked the opportunity
    pub async fn find_student_ids(opportunity_id: &str, pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT student_id FROM bookmarks
             WHERE opportunity_id = $1 AND student_id IS NOT NULL",
        )
        .bind(opportunity_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
