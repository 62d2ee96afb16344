use openai_client::OpenAIError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatRelayError {
    /// Bad request body; no upstream call was made
    #[error("{0}")]
    InvalidInput(String),

    #[error("AI service is currently overloaded. Please try again shortly.")]
    RateLimited,

    /// Non-success from the chat endpoint, passed through with its status
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Internal server error")]
    Internal(String),
}

impl ChatRelayError {
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::RateLimited => 429,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => 500,
        }
    }
}

impl From<OpenAIError> for ChatRelayError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::RateLimited(_) => Self::RateLimited,
            OpenAIError::Api { status, message } => Self::Upstream { status, message },
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_errors_map_to_relay_errors() {
        let limited: ChatRelayError = OpenAIError::RateLimited("slow down".into()).into();
        assert_eq!(limited.status(), 429);
        assert_eq!(
            limited.to_string(),
            "AI service is currently overloaded. Please try again shortly."
        );

        let upstream: ChatRelayError = OpenAIError::Api {
            status: 401,
            message: "Incorrect API key provided".into(),
        }
        .into();
        assert_eq!(upstream.status(), 401);
        assert_eq!(upstream.to_string(), "Incorrect API key provided");

        let network: ChatRelayError = OpenAIError::Network("connection reset".into()).into();
        assert_eq!(network.status(), 500);
        assert_eq!(network.to_string(), "Internal server error");
    }
}
