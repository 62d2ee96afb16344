//! Relay a conversation to the chat model behind the coach persona.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use openai_client::{ChatRequest, Message, SpeechRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::domains::chat::error::ChatRelayError;
use crate::kernel::ChatRelayDeps;

const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.7;
const EMPTY_REPLY: &str = "No response from AI.";

/// Body of `POST /chat`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRelayRequest {
    /// Kept loose so a non-array is a validation error rather than a parse error
    pub messages: Option<Value>,
    pub resume_id: Option<String>,
    pub training_type: Option<String>,
    /// Also synthesize the reply as speech; null means no
    #[serde(default)]
    pub audio: Option<bool>,
}

/// One prior turn as the app stores it
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub role: String,
    pub text: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpeechPayload {
    /// Base64 audio, null when synthesis failed
    pub audio: Option<String>,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub speech: Option<SpeechPayload>,
}

/// System prompt first, then the history with `ai` turns renamed to `assistant`
pub fn build_messages(system_prompt: String, history: &[IncomingMessage]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::system(system_prompt));
    messages.extend(history.iter().map(|m| {
        let role = if m.role == "ai" { "assistant" } else { m.role.as_str() };
        let content = m
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(m.content.as_deref())
            .unwrap_or_default();
        Message::new(role, content)
    }));
    messages
}

fn parse_history(messages: Option<&Value>) -> Result<Vec<IncomingMessage>, ChatRelayError> {
    let required = || ChatRelayError::InvalidInput("Messages array is required.".into());
    let items = match messages {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(required()),
    };
    items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).map_err(|_| required()))
        .collect()
}

pub async fn relay_chat(
    request: ChatRelayRequest,
    deps: &ChatRelayDeps,
) -> Result<ChatReply, ChatRelayError> {
    let history = parse_history(request.messages.as_ref())?;

    let system_prompt = deps
        .prompt
        .build(request.resume_id.as_deref(), request.training_type.as_deref());
    let chat = ChatRequest::new(&deps.chat_model)
        .messages(build_messages(system_prompt, &history))
        .max_tokens(MAX_TOKENS)
        .temperature(TEMPERATURE);

    let response = deps.ai.chat_completion(chat).await.map_err(|e| {
        error!(error = %e, "OpenAI error");
        ChatRelayError::from(e)
    })?;

    let reply = response
        .content
        .map(|c| c.trim().to_string())
        .unwrap_or_else(|| EMPTY_REPLY.to_string());
    debug!(chars = reply.len(), "Chat reply received");

    let speech = if request.audio.unwrap_or(false) {
        Some(synthesize(&reply, deps).await)
    } else {
        None
    };

    Ok(ChatReply { reply, speech })
}

/// Speech for the reply; failures degrade to `audio: null`
async fn synthesize(reply: &str, deps: &ChatRelayDeps) -> SpeechPayload {
    let request = SpeechRequest::new(&deps.tts_model, &deps.tts_voice, reply);
    let mime_type = request.mime_type().to_string();

    if reply.is_empty() {
        return SpeechPayload {
            audio: None,
            mime_type,
        };
    }

    match deps.ai.create_speech(request).await {
        Ok(speech) => SpeechPayload {
            audio: Some(STANDARD.encode(&speech.audio)),
            mime_type: speech.mime_type,
        },
        Err(e) => {
            warn!(error = %e, "Speech synthesis failed, returning text only");
            SpeechPayload {
                audio: None,
                mime_type,
            }
        }
    }
}
