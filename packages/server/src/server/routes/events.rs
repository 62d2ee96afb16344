use axum::{extract::rejection::JsonRejection, extract::Extension, http::StatusCode, Json};
use chrono::Utc;
use tracing::{error, info};

use crate::domains::events::{route_event, DocumentEvent};
use crate::server::app::AppState;
use crate::server::ApiError;

/// POST /events
///
/// Handler failures are logged and still acknowledged with 204: the writer
/// of the document has no way to act on them. Only a malformed envelope is
/// answered with 400.
pub async fn events_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<DocumentEvent>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(event) = payload.map_err(|e| ApiError::BadRequest(format!("Invalid event: {}", e)))?;

    match route_event(&event, Utc::now(), &state.deps).await {
        Ok(routed) => info!(document = %event.document, ?routed, "Event handled"),
        Err(e) => error!(document = %event.document, error = %e, "Event handler failed"),
    }
    Ok(StatusCode::NO_CONTENT)
}
