// Spark backend - API Core
//
// Two deployables share this crate:
// - the chat relay (interview-coach persona in front of the OpenAI chat API)
// - the notification dispatcher (document-write triggers, hourly deadline scan,
//   password reset by email)
//
// Domain logic lives in domains/*, infrastructure traits and adapters in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
