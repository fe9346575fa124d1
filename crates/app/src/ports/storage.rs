//! Storage port — the Booking Store contract.

use std::future::Future;

use slotbook_domain::appointment::Appointment;
use slotbook_domain::error::BookingError;
use slotbook_domain::id::{AppointmentId, ClientId, ProviderId};
use slotbook_domain::time_range::TimeRange;

/// Repository owning the canonical copy of every [`Appointment`].
///
/// Implementations hand out clones; callers never hold references into
/// the store. Failures of the backing technology are reported as
/// [`BookingError::Storage`].
pub trait AppointmentRepository {
    /// Append an appointment to the store.
    fn save(
        &self,
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, BookingError>> + Send;

    /// Get an appointment by its unique identifier.
    fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> impl Future<Output = Result<Option<Appointment>, BookingError>> + Send;

    /// First stored appointment of `provider_id` (in insertion order) whose
    /// range overlaps `range`.
    fn find_by_provider_and_range(
        &self,
        provider_id: &ProviderId,
        range: &TimeRange,
    ) -> impl Future<Output = Result<Option<Appointment>, BookingError>> + Send;

    /// Every appointment booked by `client_id`, in insertion order.
    fn find_all_by_client(
        &self,
        client_id: &ClientId,
    ) -> impl Future<Output = Result<Vec<Appointment>, BookingError>> + Send;
}
