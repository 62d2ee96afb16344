mod deadline_notice;
mod reminders;

pub use deadline_notice::{notify_deadline_on_apply, notify_deadline_on_bookmark};
pub use reminders::send_deadline_reminders;
