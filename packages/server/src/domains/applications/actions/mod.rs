mod notify_status_change;

pub use notify_status_change::{notify_status_change, status_copy};
