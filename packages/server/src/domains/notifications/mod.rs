//! Notifications domain - the shared push-and-record helper every trigger goes through

pub mod actions;
pub mod models;

pub use actions::{dispatch, notify_student, DispatchOutcome, DispatchRequest};
pub use models::{NewNotification, Notification, NotificationType};
