//! Applications domain - status changes pushed back to the applicant

pub mod actions;
pub mod models;

pub use actions::notify_status_change;
pub use models::{Application, ApplicationStatus};
