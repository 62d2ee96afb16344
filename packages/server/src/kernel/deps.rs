//! Dependency containers handed to domain actions and HTTP handlers
//!
//! Every external service sits behind a Base* trait so tests can swap in mocks.

use std::sync::Arc;

use crate::domains::chat::PromptTemplate;
use crate::kernel::{BaseAI, BaseAccountService, BaseDocumentStore, BaseMailer, BasePushNotificationService};

// =============================================================================
// ServerDeps (notification dispatcher)
// =============================================================================

#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseDocumentStore>,
    pub push_service: Arc<dyn BasePushNotificationService>,
    pub mailer: Arc<dyn BaseMailer>,
    pub accounts: Arc<dyn BaseAccountService>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseDocumentStore>,
        push_service: Arc<dyn BasePushNotificationService>,
        mailer: Arc<dyn BaseMailer>,
        accounts: Arc<dyn BaseAccountService>,
    ) -> Self {
        Self {
            store,
            push_service,
            mailer,
            accounts,
        }
    }
}

// =============================================================================
// ChatRelayDeps
// =============================================================================

#[derive(Clone)]
pub struct ChatRelayDeps {
    pub ai: Arc<dyn BaseAI>,
    pub prompt: Arc<PromptTemplate>,
    pub chat_model: String,
    pub tts_model: String,
    pub tts_voice: String,
}

impl ChatRelayDeps {
    /// Deps with the default models and the bundled persona
    pub fn new(ai: Arc<dyn BaseAI>) -> Self {
        Self {
            ai,
            prompt: Arc::new(PromptTemplate::bundled()),
            chat_model: openai_client::DEFAULT_CHAT_MODEL.to_string(),
            tts_model: openai_client::DEFAULT_TTS_MODEL.to_string(),
            tts_voice: openai_client::DEFAULT_TTS_VOICE.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }

    pub fn with_models(
        mut self,
        chat_model: impl Into<String>,
        tts_model: impl Into<String>,
        tts_voice: impl Into<String>,
    ) -> Self {
        self.chat_model = chat_model.into();
        self.tts_model = tts_model.into();
        self.tts_voice = tts_voice.into();
        self
    }
}
