// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "notify followers") lives in domain actions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseDocumentStore, BaseMailer)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openai_client::{ChatRequest, ChatResponse, OpenAIError, SpeechRequest, SpeechResponse};

use crate::common::DataMap;
use crate::domains::auth::models::PasswordResetTicket;
use crate::domains::notifications::models::{NewNotification, NotificationType};
use crate::domains::opportunities::models::{Company, Opportunity};
use crate::domains::reviews::models::Review;
use crate::domains::students::Student;

// =============================================================================
// Document Store Trait (Infrastructure - persistence)
// =============================================================================

#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Cheap round trip used by the health check
    async fn ping(&self) -> Result<()>;

    async fn find_student(&self, id: &str) -> Result<Option<Student>>;

    /// Students whose followed companies include `company_id`
    async fn find_followers(&self, company_id: &str) -> Result<Vec<Student>>;

    async fn clear_fcm_token(&self, student_id: &str) -> Result<()>;

    async fn find_company(&self, id: &str) -> Result<Option<Company>>;

    async fn find_opportunity(&self, id: &str) -> Result<Option<Opportunity>>;

    /// Active opportunities with a deadline in `[from, to)`
    async fn find_opportunities_with_deadline_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Opportunity>>;

    async fn find_review(&self, id: &str) -> Result<Option<Review>>;

    async fn find_bookmarker_ids(&self, opportunity_id: &str) -> Result<Vec<String>>;

    async fn find_pending_applicant_ids(&self, opportunity_id: &str) -> Result<Vec<String>>;

    async fn add_notification(&self, notification: NewNotification) -> Result<()>;

    /// Append several records in one atomic write
    async fn add_notifications(&self, notifications: Vec<NewNotification>) -> Result<()>;

    /// Whether `user_id` already has a record of `notification_type` whose
    /// `data.opportunityId` equals `opportunity_id`
    async fn notification_exists(
        &self,
        user_id: &str,
        notification_type: NotificationType,
        opportunity_id: &str,
    ) -> Result<bool>;

    async fn find_reset_ticket(&self, user_id: &str) -> Result<Option<PasswordResetTicket>>;

    /// Store a ticket, replacing any earlier one for the same user
    async fn save_reset_ticket(&self, ticket: PasswordResetTicket) -> Result<()>;

    async fn record_failed_attempt(&self, user_id: &str) -> Result<()>;

    async fn delete_reset_ticket(&self, user_id: &str) -> Result<()>;
}

// =============================================================================
// Account Service Trait (Infrastructure - sign-in credentials)
// =============================================================================

/// Who an email address belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub uid: String,
    pub email: String,
}

#[async_trait]
pub trait BaseAccountService: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountIdentity>>;

    /// Replace the account's credential with `new_password`
    async fn update_password(&self, uid: &str, new_password: &str) -> Result<()>;
}

// =============================================================================
// Mailer Trait (Infrastructure - outbound email)
// =============================================================================

#[async_trait]
pub trait BaseMailer: Send + Sync {
    /// Send a plain-text email
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

// =============================================================================
// Push Notification Trait (Infrastructure)
// =============================================================================

/// Platform-neutral push payload; adapters add platform hints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: DataMap,
}

/// Delivery failure reported by the push provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct PushError {
    /// Admin-SDK style code, e.g. `messaging/registration-token-not-registered`
    pub code: String,
    pub message: String,
}

impl PushError {
    pub const TOKEN_NOT_REGISTERED: &'static str = "messaging/registration-token-not-registered";
    pub const INVALID_TOKEN: &'static str = "messaging/invalid-registration-token";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The token will never work again and should be forgotten
    pub fn is_invalid_token(&self) -> bool {
        self.code == Self::TOKEN_NOT_REGISTERED || self.code == Self::INVALID_TOKEN
    }
}

/// Per-token outcome of a multicast, in input order
#[derive(Debug, Default)]
pub struct MulticastReport {
    pub results: Vec<(String, std::result::Result<(), PushError>)>,
}

impl MulticastReport {
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    /// Tokens the provider reported as permanently invalid
    pub fn invalid_tokens(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter_map(|(token, r)| match r {
                Err(e) if e.is_invalid_token() => Some(token.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
pub trait BasePushNotificationService: Send + Sync {
    async fn send(&self, token: &str, message: &PushMessage) -> std::result::Result<(), PushError>;

    /// Send the same message to every token; `Err` only when the whole batch failed
    async fn send_multicast(&self, tokens: &[String], message: &PushMessage)
        -> Result<MulticastReport>;
}

// =============================================================================
// AI Trait (Infrastructure - chat and speech)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse, OpenAIError>;

    async fn create_speech(&self, request: SpeechRequest) -> Result<SpeechResponse, OpenAIError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_codes() {
        assert!(PushError::new(PushError::TOKEN_NOT_REGISTERED, "gone").is_invalid_token());
        assert!(PushError::new(PushError::INVALID_TOKEN, "bad").is_invalid_token());
        assert!(!PushError::new("messaging/internal-error", "oops").is_invalid_token());
    }

    #[test]
    fn test_multicast_report_counts() {
        let report = MulticastReport {
            results: vec![
                ("a".into(), Ok(())),
                ("b".into(), Err(PushError::new(PushError::TOKEN_NOT_REGISTERED, ""))),
                ("c".into(), Err(PushError::new("messaging/unavailable", ""))),
            ],
        };
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failure_count(), 2);
        assert_eq!(report.invalid_tokens(), vec!["b"]);
    }
}
