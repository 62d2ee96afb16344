pub mod review;

pub use review::{CompanyReply, Review};
