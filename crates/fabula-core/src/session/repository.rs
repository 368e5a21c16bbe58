//! Session log repository trait.
//!
//! Defines the interface the interaction controller persists through,
//! decoupling it from the concrete on-disk store.

use super::model::SessionRecord;
use crate::error::StoreError;

/// An abstract append-only store for session records.
///
/// The store supports exactly two operations: append one record, read all
/// records. Implementations must guarantee that a successful `append` is
/// durable and visible to every subsequent `read_all`, and that a failed
/// one leaves previously persisted records untouched.
pub trait SessionLogRepository: Send + Sync {
    /// Appends a fully-populated record to the log.
    ///
    /// All-or-nothing: on any error the persisted log is exactly what it
    /// was before the call.
    fn append(&self, record: &SessionRecord) -> Result<(), StoreError>;

    /// Returns every persisted record, oldest first.
    fn read_all(&self) -> Result<Vec<SessionRecord>, StoreError>;
}
