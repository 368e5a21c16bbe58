//! Error types for the session store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by session store operations.
///
/// Corruption of the on-disk log is intentionally absent here: a damaged log
/// is recovered in place (backed up and reset) and never reported to the
/// caller as a failure.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The record failed structural validation and was never persisted.
    #[error("invalid session record: {reason}")]
    InvalidRecord { reason: String },

    /// The sidecar lock could not be acquired within the configured bound.
    #[error("timed out after {waited_ms}ms waiting for session log lock at {path}")]
    LockTimeout { path: PathBuf, waited_ms: u64 },

    /// The in-memory log could not be converted to its storage form.
    /// No partial write has occurred when this is returned.
    #[error("failed to serialize session log: {message}")]
    Serialization { message: String },

    /// A storage-layer failure (disk full, permissions, rename failure).
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Creates an InvalidRecord error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            reason: reason.into(),
        }
    }

    /// Creates an Io error with operation and path context.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Check if this is an InvalidRecord error.
    pub fn is_invalid_record(&self) -> bool {
        matches!(self, Self::InvalidRecord { .. })
    }

    /// Check if this is a LockTimeout error.
    pub fn is_lock_timeout(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
