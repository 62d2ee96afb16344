// TestDependencies - mock implementations for testing
//
// In-memory stand-ins for every Base* trait. Each mock records the calls it
// receives so tests can assert on them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openai_client::{ChatRequest, ChatResponse, OpenAIError, SpeechRequest, SpeechResponse};

use super::{
    AccountIdentity, BaseAI, BaseAccountService, BaseDocumentStore, BaseMailer,
    BasePushNotificationService, ChatRelayDeps, MulticastReport, PushError, PushMessage,
    ServerDeps,
};
use crate::domains::applications::models::{Application, ApplicationStatus};
use crate::domains::auth::models::PasswordResetTicket;
use crate::domains::notifications::models::{NewNotification, NotificationType};
use crate::domains::opportunities::models::{Bookmark, Company, Opportunity};
use crate::domains::reviews::models::Review;
use crate::domains::students::Student;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Memory Document Store
// =============================================================================

#[derive(Default)]
pub struct MemoryDocumentStore {
    students: Mutex<HashMap<String, Student>>,
    companies: Mutex<HashMap<String, Company>>,
    opportunities: Mutex<HashMap<String, Opportunity>>,
    reviews: Mutex<HashMap<String, Review>>,
    bookmarks: Mutex<Vec<Bookmark>>,
    applications: Mutex<Vec<Application>>,
    notifications: Mutex<Vec<NewNotification>>,
    tickets: Mutex<HashMap<String, PasswordResetTicket>>,
    fail_writes: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_student(self, id: &str, fcm_token: Option<&str>, followed: &[&str]) -> Self {
        lock(&self.students).insert(
            id.to_string(),
            Student {
                id: id.to_string(),
                fcm_token: fcm_token.map(str::to_string),
                followed_companies: followed.iter().map(|c| c.to_string()).collect(),
            },
        );
        self
    }

    pub fn with_company(self, id: &str, name: &str) -> Self {
        lock(&self.companies).insert(
            id.to_string(),
            Company {
                id: id.to_string(),
                company_name: Some(name.to_string()),
            },
        );
        self
    }

    pub fn with_opportunity(self, opportunity: Opportunity) -> Self {
        lock(&self.opportunities).insert(opportunity.id.clone(), opportunity);
        self
    }

    pub fn with_review(self, review: Review) -> Self {
        lock(&self.reviews).insert(review.id.clone(), review);
        self
    }

    pub fn with_bookmark(self, student_id: &str, opportunity_id: &str) -> Self {
        let mut bookmarks = lock(&self.bookmarks);
        let id = format!("b{}", bookmarks.len() + 1);
        bookmarks.push(Bookmark {
            id,
            student_id: Some(student_id.to_string()),
            opportunity_id: Some(opportunity_id.to_string()),
        });
        drop(bookmarks);
        self
    }

    pub fn with_application(
        self,
        student_id: &str,
        opportunity_id: &str,
        status: ApplicationStatus,
    ) -> Self {
        let mut applications = lock(&self.applications);
        let id = format!("a{}", applications.len() + 1);
        applications.push(Application {
            id,
            student_id: Some(student_id.to_string()),
            opportunity_id: Some(opportunity_id.to_string()),
            status: Some(status),
        });
        drop(applications);
        self
    }

    pub fn with_notification(self, notification: NewNotification) -> Self {
        lock(&self.notifications).push(notification);
        self
    }

    pub fn with_ticket(self, ticket: PasswordResetTicket) -> Self {
        lock(&self.tickets).insert(ticket.user_id.clone(), ticket);
        self
    }

    /// Make every notification write fail (simulates a store outage)
    pub fn with_failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn notifications(&self) -> Vec<NewNotification> {
        lock(&self.notifications).clone()
    }

    pub fn notifications_for(&self, user_id: &str) -> Vec<NewNotification> {
        lock(&self.notifications)
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn student(&self, id: &str) -> Option<Student> {
        lock(&self.students).get(id).cloned()
    }

    pub fn ticket(&self, user_id: &str) -> Option<PasswordResetTicket> {
        lock(&self.tickets).get(user_id).cloned()
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("document store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl BaseDocumentStore for MemoryDocumentStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_student(&self, id: &str) -> Result<Option<Student>> {
        Ok(self.student(id))
    }

    async fn find_followers(&self, company_id: &str) -> Result<Vec<Student>> {
        let mut followers: Vec<Student> = lock(&self.students)
            .values()
            .filter(|s| s.followed_companies.iter().any(|c| c == company_id))
            .cloned()
            .collect();
        followers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(followers)
    }

    async fn clear_fcm_token(&self, student_id: &str) -> Result<()> {
        if let Some(student) = lock(&self.students).get_mut(student_id) {
            student.fcm_token = None;
        }
        Ok(())
    }

    async fn find_company(&self, id: &str) -> Result<Option<Company>> {
        Ok(lock(&self.companies).get(id).cloned())
    }

    async fn find_opportunity(&self, id: &str) -> Result<Option<Opportunity>> {
        Ok(lock(&self.opportunities).get(id).cloned())
    }

    async fn find_opportunities_with_deadline_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Opportunity>> {
        Ok(lock(&self.opportunities)
            .values()
            .filter(|o| o.is_active)
            .filter(|o| matches!(o.application_deadline, Some(d) if d >= from && d < to))
            .cloned()
            .collect())
    }

    async fn find_review(&self, id: &str) -> Result<Option<Review>> {
        Ok(lock(&self.reviews).get(id).cloned())
    }

    async fn find_bookmarker_ids(&self, opportunity_id: &str) -> Result<Vec<String>> {
        Ok(lock(&self.bookmarks)
            .iter()
            .filter(|b| b.opportunity_id.as_deref() == Some(opportunity_id))
            .filter_map(|b| b.student_id.clone())
            .collect())
    }

    async fn find_pending_applicant_ids(&self, opportunity_id: &str) -> Result<Vec<String>> {
        Ok(lock(&self.applications)
            .iter()
            .filter(|a| a.opportunity_id.as_deref() == Some(opportunity_id))
            .filter(|a| a.status == Some(ApplicationStatus::Pending))
            .filter_map(|a| a.student_id.clone())
            .collect())
    }

    async fn add_notification(&self, notification: NewNotification) -> Result<()> {
        self.check_writes()?;
        lock(&self.notifications).push(notification);
        Ok(())
    }

    async fn add_notifications(&self, notifications: Vec<NewNotification>) -> Result<()> {
        self.check_writes()?;
        lock(&self.notifications).extend(notifications);
        Ok(())
    }

    async fn notification_exists(
        &self,
        user_id: &str,
        notification_type: NotificationType,
        opportunity_id: &str,
    ) -> Result<bool> {
        Ok(lock(&self.notifications).iter().any(|n| {
            n.user_id == user_id
                && n.notification_type == notification_type
                && n.data.get("opportunityId").map(String::as_str) == Some(opportunity_id)
        }))
    }

    async fn find_reset_ticket(&self, user_id: &str) -> Result<Option<PasswordResetTicket>> {
        Ok(self.ticket(user_id))
    }

    async fn save_reset_ticket(&self, ticket: PasswordResetTicket) -> Result<()> {
        lock(&self.tickets).insert(ticket.user_id.clone(), ticket);
        Ok(())
    }

    async fn record_failed_attempt(&self, user_id: &str) -> Result<()> {
        if let Some(ticket) = lock(&self.tickets).get_mut(user_id) {
            ticket.attempts += 1;
        }
        Ok(())
    }

    async fn delete_reset_ticket(&self, user_id: &str) -> Result<()> {
        lock(&self.tickets).remove(user_id);
        Ok(())
    }
}

// =============================================================================
// Mock Push Service
// =============================================================================

pub struct MockPushService {
    failures: Arc<Mutex<HashMap<String, PushError>>>,
    sent: Arc<Mutex<Vec<(String, PushMessage)>>>,
    multicasts: Arc<Mutex<Vec<(Vec<String>, PushMessage)>>>,
}

impl MockPushService {
    pub fn new() -> Self {
        Self {
            failures: Arc::new(Mutex::new(HashMap::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            multicasts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every send to `token` with the given messaging code
    pub fn with_failure(self, token: &str, code: &str) -> Self {
        lock(&self.failures).insert(token.to_string(), PushError::new(code, "mock failure"));
        self
    }

    /// Single sends attempted, including failed ones
    pub fn sent(&self) -> Vec<(String, PushMessage)> {
        lock(&self.sent).clone()
    }

    pub fn multicasts(&self) -> Vec<(Vec<String>, PushMessage)> {
        lock(&self.multicasts).clone()
    }

    fn outcome(&self, token: &str) -> std::result::Result<(), PushError> {
        match lock(&self.failures).get(token) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MockPushService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePushNotificationService for MockPushService {
    async fn send(&self, token: &str, message: &PushMessage) -> std::result::Result<(), PushError> {
        lock(&self.sent).push((token.to_string(), message.clone()));
        self.outcome(token)
    }

    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<MulticastReport> {
        lock(&self.multicasts).push((tokens.to_vec(), message.clone()));
        Ok(MulticastReport {
            results: tokens
                .iter()
                .map(|t| (t.clone(), self.outcome(t)))
                .collect(),
        })
    }
}

// =============================================================================
// Mock Mailer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    failing: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl BaseMailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        if self.failing {
            anyhow::bail!("SMTP relay refused connection");
        }
        lock(&self.sent).push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Mock Accounts
// =============================================================================

#[derive(Default)]
pub struct MockAccounts {
    accounts: Mutex<Vec<AccountIdentity>>,
    passwords: Mutex<HashMap<String, String>>,
}

impl MockAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, uid: &str, email: &str) -> Self {
        lock(&self.accounts).push(AccountIdentity {
            uid: uid.to_string(),
            email: email.to_string(),
        });
        self
    }

    /// Last password set through `update_password`
    pub fn password_for(&self, uid: &str) -> Option<String> {
        lock(&self.passwords).get(uid).cloned()
    }
}

#[async_trait]
impl BaseAccountService for MockAccounts {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountIdentity>> {
        Ok(lock(&self.accounts)
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_password(&self, uid: &str, new_password: &str) -> Result<()> {
        lock(&self.passwords).insert(uid.to_string(), new_password.to_string());
        Ok(())
    }
}

// =============================================================================
// Mock AI
// =============================================================================

pub struct MockAI {
    chat_responses: Mutex<Vec<std::result::Result<ChatResponse, OpenAIError>>>,
    speech_failure: Mutex<Option<OpenAIError>>,
    chat_calls: Arc<Mutex<Vec<ChatRequest>>>,
    speech_calls: Arc<Mutex<Vec<SpeechRequest>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            chat_responses: Mutex::new(Vec::new()),
            speech_failure: Mutex::new(None),
            chat_calls: Arc::new(Mutex::new(Vec::new())),
            speech_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(self, content: &str) -> Self {
        lock(&self.chat_responses).push(Ok(ChatResponse {
            content: Some(content.to_string()),
            usage: None,
        }));
        self
    }

    /// Upstream returned no choices
    pub fn with_empty_reply(self) -> Self {
        lock(&self.chat_responses).push(Ok(ChatResponse {
            content: None,
            usage: None,
        }));
        self
    }

    pub fn with_chat_error(self, error: OpenAIError) -> Self {
        lock(&self.chat_responses).push(Err(error));
        self
    }

    pub fn with_speech_error(self, error: OpenAIError) -> Self {
        *lock(&self.speech_failure) = Some(error);
        self
    }

    pub fn chat_calls(&self) -> Vec<ChatRequest> {
        lock(&self.chat_calls).clone()
    }

    pub fn speech_calls(&self) -> Vec<SpeechRequest> {
        lock(&self.speech_calls).clone()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn chat_completion(
        &self,
        request: ChatRequest,
    ) -> std::result::Result<ChatResponse, OpenAIError> {
        lock(&self.chat_calls).push(request);
        let mut responses = lock(&self.chat_responses);
        if responses.is_empty() {
            Ok(ChatResponse {
                content: Some("Mock reply".to_string()),
                usage: None,
            })
        } else {
            responses.remove(0)
        }
    }

    async fn create_speech(
        &self,
        request: SpeechRequest,
    ) -> std::result::Result<SpeechResponse, OpenAIError> {
        let mime_type = request.mime_type().to_string();
        lock(&self.speech_calls).push(request);
        if let Some(error) = lock(&self.speech_failure).take() {
            return Err(error);
        }
        Ok(SpeechResponse {
            audio: b"mock-audio".to_vec(),
            mime_type,
        })
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of mocks plus the deps containers built from them
pub struct TestDependencies {
    pub store: Arc<MemoryDocumentStore>,
    pub push: Arc<MockPushService>,
    pub mailer: Arc<MockMailer>,
    pub accounts: Arc<MockAccounts>,
    pub ai: Arc<MockAI>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryDocumentStore::new()),
            push: Arc::new(MockPushService::new()),
            mailer: Arc::new(MockMailer::new()),
            accounts: Arc::new(MockAccounts::new()),
            ai: Arc::new(MockAI::new()),
        }
    }

    pub fn with_store(mut self, store: MemoryDocumentStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn with_push(mut self, push: MockPushService) -> Self {
        self.push = Arc::new(push);
        self
    }

    pub fn with_mailer(mut self, mailer: MockMailer) -> Self {
        self.mailer = Arc::new(mailer);
        self
    }

    pub fn with_accounts(mut self, accounts: MockAccounts) -> Self {
        self.accounts = Arc::new(accounts);
        self
    }

    pub fn with_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.store.clone(),
            self.push.clone(),
            self.mailer.clone(),
            self.accounts.clone(),
        )
    }

    pub fn chat_deps(&self) -> ChatRelayDeps {
        ChatRelayDeps::new(self.ai.clone())
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
