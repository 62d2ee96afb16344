//! Events domain - document-write events arriving over HTTP
//!
//! Each supported (document, kind) pair maps to exactly one notification handler.

pub mod path;
pub mod router;

pub use path::DocumentPath;
pub use router::{route_event, DocumentEvent, EventKind, Routed};
