use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::DataMap;

/// Wire tag stored on each record and merged into push data as `type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    NewOpportunity,
    ReviewReply,
    ApplicationStatusUpdate,
    DeadlineInfo,
    DeadlineReminder,
    Test,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewOpportunity => "new_opportunity",
            Self::ReviewReply => "review_reply",
            Self::ApplicationStatusUpdate => "application_status_update",
            Self::DeadlineInfo => "deadline_info",
            Self::DeadlineReminder => "deadline_reminder",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification record about to be appended for a student
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub body: String,
    pub data: DataMap,
    /// Extra top-level fields, always a JSON object
    pub extra: serde_json::Value,
}

/// Stored in-app notification
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: uuid::Uuid,
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub body: String,
    pub data: Json<DataMap>,
    pub extra: Json<serde_json::Value>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Notification {
    /// Append one record; `read` starts false and `created_at` comes from the database
    pub async fn create(new: &NewNotification, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO notifications (id, user_id, notification_type, title, body, data, extra)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, user_id, notification_type, title, body, data, extra, read, created_at",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(&new.user_id)
        .bind(new.notification_type.as_str())
        .bind(&new.title)
        .bind(&new.body)
        .bind(Json(&new.data))
        .bind(Json(&new.extra))
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Append several records atomically
    pub async fn create_batch(records: &[NewNotification], pool: &PgPool) -> Result<()> {
        let mut tx = pool.begin().await?;
        for new in records {
            sqlx::query(
                "INSERT INTO notifications (id, user_id, notification_type, title, body, data, extra)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(uuid::Uuid::new_v4())
            .bind(&new.user_id)
            .bind(new.notification_type.as_str())
            .bind(&new.title)
            .bind(&new.body)
            .bind(Json(&new.data))
            .bind(Json(&new.extra))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Whether the student already has a record of this type about the opportunity
    pub async fn exists_for_opportunity(
        user_id: &str,
        notification_type: NotificationType,
        opportunity_id: &str,
        pool: &PgPool,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM notifications
                WHERE user_id = $1
                  AND notification_type = $2
                  AND data->>'opportunityId' = $3
             )",
        )
        .bind(user_id)
        .bind(notification_type.as_str())
        .bind(opportunity_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
