//! Deadlines domain - telling students when an opportunity is about to close
//!
//! Two paths:
//! - an immediate notice when a student applies or bookmarks
//! - the hourly scan that reminds interested students a day ahead

pub mod actions;
pub mod proximity;

pub use actions::{notify_deadline_on_apply, notify_deadline_on_bookmark, send_deadline_reminders};
pub use proximity::DeadlineProximity;
