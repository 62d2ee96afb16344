use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Where a student's application stands with the company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Interviewing,
    Rejected,
    Hired,
    /// Anything companies invent beyond the known set
    Other(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Reviewed => "Reviewed",
            Self::Interviewing => "Interviewing",
            Self::Rejected => "Rejected",
            Self::Hired => "Hired",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ApplicationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Pending" => Self::Pending,
            "Reviewed" => Self::Reviewed,
            "Interviewing" => Self::Interviewing,
            "Rejected" => Self::Rejected,
            "Hired" => Self::Hired,
            _ => Self::Other(s),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student's application to an opportunity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default)]
    pub id: String,
    pub student_id: Option<String>,
    pub opportunity_id: Option<String>,
    pub status: Option<ApplicationStatus>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Application {
    /// Students with a still-pending application to the opportunity
    pub async fn find_pending_student_ids(
        opportunity_id: &str,
        pool: &PgPool,
    ) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT student_id FROM applications
             WHERE opportunity_id = $1 AND status = 'Pending' AND student_id IS NOT NULL",
        )
        .bind(opportunity_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
