//! Error types for OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered 429 Too Many Requests
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// Upstream HTTP status, when the error came from an API response.
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenAIError::RateLimited(_) => Some(429),
            OpenAIError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build an error from a non-success response.
    ///
    /// OpenAI error bodies look like `{"error": {"message": "..."}}`; anything
    /// else falls back to a generic message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<crate::types::ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "OpenAI API error".to_string());

        if status == 429 {
            OpenAIError::RateLimited(message)
        } else {
            OpenAIError::Api { status, message }
        }
    }
}
