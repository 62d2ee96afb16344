//! Chat domain - interview-coach relay in front of the chat completion API

pub mod actions;
pub mod error;
pub mod prompt;

pub use actions::{relay_chat, ChatRelayRequest, ChatReply};
pub use error::ChatRelayError;
pub use prompt::PromptTemplate;
