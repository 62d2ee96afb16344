// HTTP routes
pub mod chat;
pub mod events;
pub mod health;
pub mod password;
pub mod test_notification;

pub use chat::*;
pub use events::*;
pub use health::*;
pub use password::*;
pub use test_notification::*;
