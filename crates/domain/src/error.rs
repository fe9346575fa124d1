//! Error taxonomy shared across the workspace.
//!
//! Each concern gets its own typed error; [`BookingError`] folds them
//! together via `#[from]` so every layer can use `?`.

use crate::id::AppointmentId;
use crate::time_range::Timestamp;

/// Top-level error returned by every booking operation.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// The requested time range is malformed or starts in the past.
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),

    /// The provider already holds an overlapping appointment.
    #[error(transparent)]
    SlotConflict(#[from] SlotConflictError),

    /// An input field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A looked-up appointment does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The backing store failed to persist or query.
    #[error("storage error: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons a [`TimeRange`](crate::time_range::TimeRange) cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRangeError {
    #[error("start time must be before end time (start: {}, end: {})", .start.to_rfc3339(), .end.to_rfc3339())]
    StartNotBeforeEnd { start: Timestamp, end: Timestamp },

    #[error("invalid time range: start time ({}) is in the past, current time is ({})", .start.to_rfc3339(), .now.to_rfc3339())]
    StartInPast { start: Timestamp, now: Timestamp },
}

/// The provider is already booked for an overlapping range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Provider already has an appointment at this time (existing appointment: {existing})")]
pub struct SlotConflictError {
    /// Identifier of the appointment that blocks the slot.
    pub existing: AppointmentId,
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("client id must not be empty")]
    EmptyClientId,

    #[error("provider id must not be empty")]
    EmptyProviderId,

    #[error("invalid appointment id: {0}")]
    MalformedAppointmentId(String),
}

/// A requested record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
