//! Students domain - push delivery targets and notification recipients

pub mod models;

pub use models::Student;
