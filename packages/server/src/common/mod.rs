// Common types and utilities shared across the application

pub mod types;
pub mod utils;

pub use types::*;
pub use utils::*;
