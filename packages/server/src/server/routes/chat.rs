use axum::{extract::rejection::JsonRejection, extract::Extension, Json};

use crate::domains::chat::{relay_chat, ChatRelayError, ChatRelayRequest, ChatReply};
use crate::server::app::ChatState;
use crate::server::ApiError;

/// POST /chat
pub async fn chat_handler(
    Extension(state): Extension<ChatState>,
    payload: Result<Json<ChatRelayRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    // A missing or malformed `messages` is reported by the relay itself
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected chat body");
        ChatRelayError::InvalidInput(format!("Invalid request body: {}", e.body_text()))
    })?;

    let reply = relay_chat(request, &state.deps).await?;
    Ok(Json(reply))
}
