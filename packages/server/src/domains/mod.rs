pub mod applications;
pub mod auth;
pub mod chat;
pub mod deadlines;
pub mod events;
pub mod notifications;
pub mod opportunities;
pub mod reviews;
pub mod students;
