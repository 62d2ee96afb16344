use axum::{
    extract::{Extension, Query},
    http::StatusCode,
};
use serde::Deserialize;

use crate::common::data_map;
use crate::domains::notifications::{notify_student, DispatchRequest, NotificationType};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNotificationParams {
    pub user_id: Option<String>,
}

/// GET /testNotification?userId=...
///
/// Sends a fixed notification through the normal dispatch path.
pub async fn test_notification_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<TestNotificationParams>,
) -> (StatusCode, &'static str) {
    let Some(user_id) = params.user_id.filter(|u| !u.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing userId parameter");
    };

    let request = DispatchRequest::new(
        user_id,
        NotificationType::Test,
        "Test Notification",
        "This is a test notification from Spark!",
    )
    .with_data(data_map([("route", "/notifications")]));

    if notify_student(request, &state.deps).await {
        (StatusCode::OK, "✅ Test notification sent successfully!")
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "❌ Failed to send test notification",
        )
    }
}
