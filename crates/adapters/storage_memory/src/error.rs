//! Storage-specific error type for the in-memory store.

use slotbook_domain::error::BookingError;
use slotbook_domain::id::AppointmentId;

/// Errors originating from the in-memory storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A thread panicked while holding the store lock.
    #[error("appointment store lock poisoned")]
    Poisoned,

    /// An appointment with the same id is already stored.
    #[error("duplicate appointment id {0}")]
    DuplicateId(AppointmentId),
}

impl From<StorageError> for BookingError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
