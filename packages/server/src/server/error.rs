//! HTTP error responses.
//!
//! Chat and plain validation errors render as `{"error": "<message>"}`;
//! password reset errors as `{"error": {"code": "...", "message": "..."}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::domains::auth::PasswordResetError;
use crate::domains::chat::ChatRelayError;

#[derive(Debug)]
pub enum ApiError {
    /// 400 with a plain message
    BadRequest(String),
    Chat(ChatRelayError),
    PasswordReset(PasswordResetError),
}

impl From<ChatRelayError> for ApiError {
    fn from(err: ChatRelayError) -> Self {
        Self::Chat(err)
    }
}

impl From<PasswordResetError> for ApiError {
    fn from(err: PasswordResetError) -> Self {
        Self::PasswordReset(err)
    }
}

fn password_reset_status(err: &PasswordResetError) -> StatusCode {
    match err {
        PasswordResetError::InvalidArgument(_) | PasswordResetError::InvalidCode => {
            StatusCode::BAD_REQUEST
        }
        PasswordResetError::NotFound(_) => StatusCode::NOT_FOUND,
        PasswordResetError::Expired => StatusCode::GONE,
        PasswordResetError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
        PasswordResetError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Chat(err) => {
                if let ChatRelayError::Internal(detail) = &err {
                    error!(error = %detail, "Chat relay failed");
                }
                let status = StatusCode::from_u16(err.status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, Json(json!({ "error": err.to_string() }))).into_response()
            }
            ApiError::PasswordReset(err) => {
                let status = password_reset_status(&err);
                let message = match &err {
                    PasswordResetError::Internal(e) => {
                        error!(error = %e, "Password reset failed");
                        "Internal error".to_string()
                    }
                    other => other.to_string(),
                };
                (
                    status,
                    Json(json!({ "error": { "code": err.code(), "message": message } })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_reset_statuses() {
        let cases = [
            (PasswordResetError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (PasswordResetError::Expired, StatusCode::GONE),
            (PasswordResetError::TooManyAttempts, StatusCode::TOO_MANY_REQUESTS),
            (PasswordResetError::InvalidCode, StatusCode::BAD_REQUEST),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn test_upstream_status_passes_through() {
        let err = ChatRelayError::Upstream {
            status: 401,
            message: "bad key".into(),
        };
        assert_eq!(
            ApiError::from(err).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
