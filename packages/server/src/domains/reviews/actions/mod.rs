mod notify_company_reply;
mod notify_review_reply;

pub use notify_company_reply::notify_company_reply;
pub use notify_review_reply::notify_review_reply;
