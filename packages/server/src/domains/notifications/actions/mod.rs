//! Notification actions - the one path every trigger uses to reach a student

mod dispatch;

pub use dispatch::{dispatch, notify_student, DispatchOutcome, DispatchRequest};
