//! Application setup and router construction for both deployables.

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::{ChatRelayDeps, ServerDeps};
use crate::server::routes::{
    chat_handler, events_handler, health_handler, relay_health_handler,
    send_password_otp_handler, test_notification_handler, verify_password_otp_handler,
};

/// Shared state for the notification dispatcher
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// Shared state for the chat relay
#[derive(Clone)]
pub struct ChatState {
    pub deps: ChatRelayDeps,
}

fn cors() -> CorsLayer {
    // Mobile clients call from arbitrary origins
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Router for the notification dispatcher
pub fn build_app(deps: ServerDeps) -> Router {
    Router::new()
        .route("/events", post(events_handler))
        .route("/sendPasswordOtp", post(send_password_otp_handler))
        .route("/verifyPasswordOtp", post(verify_password_otp_handler))
        .route("/testNotification", get(test_notification_handler))
        .route("/health", get(health_handler))
        .layer(Extension(AppState { deps }))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

/// Router for the chat relay
pub fn build_chat_app(deps: ChatRelayDeps) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(relay_health_handler))
        .layer(Extension(ChatState { deps }))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}
