//! Infrastructure layer for Fabula: the atomic JSON session store, platform
//! path resolution, and configuration loading.

pub mod config_storage;
pub mod paths;
pub mod store;

pub use crate::paths::FabulaPaths;
pub use crate::store::{JsonSessionStore, SidecarLock};
