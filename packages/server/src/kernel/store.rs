// Postgres implementation of BaseDocumentStore
//
// Thin adapter: every query lives on the domain models.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::BaseDocumentStore;
use crate::domains::applications::models::Application;
use crate::domains::auth::models::PasswordResetTicket;
use crate::domains::notifications::models::{NewNotification, Notification, NotificationType};
use crate::domains::opportunities::models::{Bookmark, Company, Opportunity};
use crate::domains::reviews::models::Review;
use crate::domains::students::Student;

#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseDocumentStore for PostgresDocumentStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_student(&self, id: &str) -> Result<Option<Student>> {
        Student::find_by_id(id, &self.pool).await
    }

    async fn find_followers(&self, company_id: &str) -> Result<Vec<Student>> {
        Student::find_following(company_id, &self.pool).await
    }

    async fn clear_fcm_token(&self, student_id: &str) -> Result<()> {
        Student::clear_fcm_token(student_id, &self.pool).await
    }

    async fn find_company(&self, id: &str) -> Result<Option<Company>> {
        Company::find_by_id(id, &self.pool).await
    }

    async fn find_opportunity(&self, id: &str) -> Result<Option<Opportunity>> {
        Opportunity::find_by_id(id, &self.pool).await
    }

    async fn find_opportunities_with_deadline_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Opportunity>> {
        Opportunity::find_active_with_deadline_between(from, to, &self.pool).await
    }

    async fn find_review(&self, id: &str) -> Result<Option<Review>> {
        Review::find_by_id(id, &self.pool).await
    }

    async fn find_bookmarker_ids(&self, opportunity_id: &str) -> Result<Vec<String>> {
        Bookmark::find_student_ids(opportunity_id, &self.pool).await
    }

    async fn find_pending_applicant_ids(&self, opportunity_id: &str) -> Result<Vec<String>> {
        Application::find_pending_student_ids(opportunity_id, &self.pool).await
    }

    async fn add_notification(&self, notification: NewNotification) -> Result<()> {
        Notification::create(&notification, &self.pool).await?;
        Ok(())
    }

    async fn add_notifications(&self, notifications: Vec<NewNotification>) -> Result<()> {
        Notification::create_batch(&notifications, &self.pool).await
    }

    async fn notification_exists(
        &self,
        user_id: &str,
        notification_type: NotificationType,
        opportunity_id: &str,
    ) -> Result<bool> {
        Notification::exists_for_opportunity(user_id, notification_type, opportunity_id, &self.pool)
            .await
    }

    async fn find_reset_ticket(&self, user_id: &str) -> Result<Option<PasswordResetTicket>> {
        PasswordResetTicket::find_by_user(user_id, &self.pool).await
    }

    async fn save_reset_ticket(&self, ticket: PasswordResetTicket) -> Result<()> {
        ticket.upsert(&self.pool).await
    }

    async fn record_failed_attempt(&self, user_id: &str) -> Result<()> {
        PasswordResetTicket::increment_attempts(user_id, &self.pool).await
    }

    async fn delete_reset_ticket(&self, user_id: &str) -> Result<()> {
        PasswordResetTicket::delete(user_id, &self.pool).await
    }
}
