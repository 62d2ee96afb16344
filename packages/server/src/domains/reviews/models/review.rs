use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Review of a company written by a student
///
/// Replies written by students are reviews too, pointing back at the
/// original with `parent_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: String,
    pub student_id: Option<String>,
    pub parent_id: Option<String>,
    pub company_id: Option<String>,
    pub review_text: Option<String>,
}

/// Company response stored under `reviews/{reviewId}/replies/{replyId}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyReply {
    pub company_id: Option<String>,
    pub company_name: Option<String>,
}

impl Review {
    pub async fn find_by_id(id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, student_id, parent_id, company_id, review_text
             FROM reviews WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Parent review ID when this review is a reply; blank ids are not parents
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}
