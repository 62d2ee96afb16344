//! Kernel module - infrastructure traits, adapters and dependency containers.

pub mod accounts;
pub mod ai;
pub mod deps;
pub mod mailer;
pub mod push;
pub mod scheduled_tasks;
pub mod store;
pub mod test_dependencies;
pub mod traits;

pub use accounts::PostgresAccountService;
pub use deps::{ChatRelayDeps, ServerDeps};
pub use mailer::SmtpMailer;
pub use push::FcmAdapter;
pub use store::PostgresDocumentStore;
pub use test_dependencies::TestDependencies;
pub use traits::*;
