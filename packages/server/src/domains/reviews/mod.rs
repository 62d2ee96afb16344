//! Reviews domain - student reviews of companies and the replies to them

pub mod actions;
pub mod models;

pub use actions::{notify_company_reply, notify_review_reply};
pub use models::{CompanyReply, Review};
