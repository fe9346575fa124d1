//! Failures of the `SQLite` Booking Store.

use slotbook_domain::error::BookingError;
use slotbook_domain::id::AppointmentId;

/// Errors raised while opening or querying the appointments database.
///
/// All of them surface to callers as [`BookingError::Storage`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The database could not be opened with the configured url.
    #[error("cannot open sqlite database {url}")]
    Open {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    /// The embedded appointments schema could not be applied.
    #[error("appointments schema migration failed")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("appointment query failed")]
    Query(#[from] sqlx::Error),

    /// The guarded insert wrote nothing, yet no overlapping row exists.
    #[error("insert of appointment {0} was refused without an overlapping booking")]
    InsertRefused(AppointmentId),
}

impl From<StorageError> for BookingError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
