use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::domains::auth::{
    send_password_otp, verify_password_otp, PasswordResetError, SendPasswordOtpRequest,
    VerifyPasswordOtpRequest,
};
use crate::server::app::AppState;
use crate::server::ApiError;

fn invalid_body(e: JsonRejection) -> ApiError {
    PasswordResetError::InvalidArgument(format!("Invalid request body: {}", e.body_text())).into()
}

/// POST /sendPasswordOtp
pub async fn send_password_otp_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SendPasswordOtpRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(invalid_body)?;
    send_password_otp(request, Utc::now(), &state.deps).await?;
    Ok(Json(json!({ "ok": true })))
}

/// POST /verifyPasswordOtp
pub async fn verify_password_otp_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<VerifyPasswordOtpRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(invalid_body)?;
    verify_password_otp(request, Utc::now(), &state.deps).await?;
    Ok(Json(json!({ "ok": true })))
}
