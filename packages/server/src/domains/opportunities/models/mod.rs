pub mod bookmark;
pub mod company;
pub mod opportunity;

pub use bookmark::Bookmark;
pub use company::Company;
pub use opportunity::Opportunity;
