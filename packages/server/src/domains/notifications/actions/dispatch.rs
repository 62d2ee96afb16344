//! Push to a student's device and append the in-app record.

use anyhow::Result;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::common::DataMap;
use crate::domains::notifications::models::{NewNotification, NotificationType};
use crate::kernel::{PushMessage, ServerDeps};

/// Everything needed to notify one student
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub user_id: String,
    pub notification_type: NotificationType,
    pub title: String,
    pub body: String,
    pub data: DataMap,
    /// Stored as extra top-level fields on the record, never pushed
    pub extra: Map<String, Value>,
}

impl DispatchRequest {
    pub fn new(
        user_id: impl Into<String>,
        notification_type: NotificationType,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            notification_type,
            title: title.into(),
            body: body.into(),
            data: DataMap::new(),
            extra: Map::new(),
        }
    }

    pub fn with_data(mut self, data: DataMap) -> Self {
        self.data = data;
        self
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// What happened on the push side of a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    /// Student has no device token; record written anyway
    NoToken,
    /// Provider rejected the token permanently and it was cleared
    TokenPruned,
    /// Transient or unknown delivery error, logged and ignored
    SendFailed,
    /// No such student; nothing sent or recorded
    RecipientMissing,
}

/// Notify one student.
///
/// Sends a push when the student has a token (the type tag is merged into the
/// push data), clears the token when the provider reports it permanently
/// invalid, then always appends a notification record. Delivery failures
/// never fail the dispatch; store failures do.
pub async fn dispatch(request: DispatchRequest, deps: &ServerDeps) -> Result<DispatchOutcome> {
    let DispatchRequest {
        user_id,
        notification_type,
        title,
        body,
        data,
        extra,
    } = request;

    let Some(student) = deps.store.find_student(&user_id).await? else {
        error!(user_id = %user_id, "Student not found, skipping notification");
        return Ok(DispatchOutcome::RecipientMissing);
    };

    let outcome = match student.push_token() {
        Some(token) => {
            let mut push_data = data.clone();
            push_data.insert("type".to_string(), notification_type.as_str().to_string());
            let message = PushMessage {
                title: title.clone(),
                body: body.clone(),
                data: push_data,
            };

            match deps.push_service.send(token, &message).await {
                Ok(()) => {
                    info!(user_id = %user_id, kind = %notification_type, "Push notification sent");
                    DispatchOutcome::Sent
                }
                Err(e) if e.is_invalid_token() => {
                    info!(user_id = %user_id, code = %e.code, "Removing invalid push token");
                    deps.store.clear_fcm_token(&user_id).await?;
                    DispatchOutcome::TokenPruned
                }
                Err(e) => {
                    error!(user_id = %user_id, error = %e, "Error sending push");
                    DispatchOutcome::SendFailed
                }
            }
        }
        None => {
            warn!(user_id = %user_id, "Student has no push token");
            DispatchOutcome::NoToken
        }
    };

    deps.store
        .add_notification(NewNotification {
            user_id: user_id.clone(),
            notification_type,
            title,
            body,
            data,
            extra: Value::Object(extra),
        })
        .await?;

    debug!(user_id = %user_id, ?outcome, "In-app notification saved");
    Ok(outcome)
}

/// [`dispatch`] collapsed to "did it complete": false when the student is
/// missing or a local step failed, true otherwise regardless of delivery.
pub async fn notify_student(request: DispatchRequest, deps: &ServerDeps) -> bool {
    let user_id = request.user_id.clone();
    match dispatch(request, deps).await {
        Ok(DispatchOutcome::RecipientMissing) => false,
        Ok(_) => true,
        Err(e) => {
            error!(user_id = %user_id, error = %e, "Error in notification dispatch");
            false
        }
    }
}
