//! Atomic session log persistence.

pub mod json_store;
pub mod lock;

pub use json_store::{JsonSessionStore, LOG_FILE_NAME};
pub use lock::SidecarLock;
