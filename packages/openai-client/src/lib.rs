//! Pure OpenAI REST API client
//!
//! A clean, minimal client for the OpenAI API with no domain-specific logic.
//! Supports chat completions and text-to-speech.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message, SpeechRequest};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! // Chat completion
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4o-mini")
//!         .message(Message::user("Hello!"))
//!         .max_tokens(800),
//! ).await?;
//!
//! // Speech
//! let speech = client
//!     .create_speech(SpeechRequest::new("gpt-4o-mini-tts", "alloy", "Hello!"))
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use reqwest::{Client, Response};
use tracing::{debug, warn};

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn post_json<T: serde::Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, path, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, path, "OpenAI API error");
            return Err(OpenAIError::from_response(status.as_u16(), &error_text));
        }

        Ok(response)
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get the first choice back.
    /// A response without choices yields `content: None` rather than an error.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self.post_json("/chat/completions", &request).await?;

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }

    /// Text-to-speech.
    ///
    /// Returns the raw audio bytes in the requested container.
    pub async fn create_speech(&self, request: SpeechRequest) -> Result<SpeechResponse> {
        let start = std::time::Instant::now();

        let response = self.post_json("/audio/speech", &request).await?;

        let audio = response
            .bytes()
            .await
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        debug!(
            model = %request.model,
            bytes = audio.len(),
            duration_ms = start.elapsed().as_millis(),
            "OpenAI speech synthesis"
        );

        Ok(SpeechResponse {
            audio: audio.to_vec(),
            mime_type: request.mime_type().to_string(),
        })
    }
}
