//! Opportunities domain - postings, the companies behind them, bookmarks
//!
//! Responsibilities:
//! - Fan-out push to followers when a company posts an opportunity

pub mod actions;
pub mod models;

pub use actions::notify_followers;
pub use models::{Bookmark, Company, Opportunity};
