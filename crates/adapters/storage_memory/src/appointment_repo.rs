//! In-memory implementation of [`AppointmentRepository`].

use std::future::{self, Future};
use std::sync::RwLock;

use slotbook_app::ports::AppointmentRepository;
use slotbook_domain::appointment::Appointment;
use slotbook_domain::error::BookingError;
use slotbook_domain::id::{AppointmentId, ClientId, ProviderId};
use slotbook_domain::time_range::TimeRange;

use crate::error::StorageError;

/// Booking Store holding every appointment in a `Vec`, in insertion order.
///
/// Queries share a read lock; `save` takes the write lock. Overlap checks
/// paired with a `save` are serialized by the booking service, not here.
#[derive(Debug, Default)]
pub struct InMemoryAppointmentRepository {
    appointments: RwLock<Vec<Appointment>>,
}

impl InMemoryAppointmentRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, query: impl FnOnce(&[Appointment]) -> T) -> Result<T, BookingError> {
        let appointments = self
            .appointments
            .read()
            .map_err(|_| StorageError::Poisoned)?;
        Ok(query(&appointments))
    }

    fn insert(&self, appointment: Appointment) -> Result<Appointment, BookingError> {
        let mut appointments = self
            .appointments
            .write()
            .map_err(|_| StorageError::Poisoned)?;
        if appointments.iter().any(|a| a.id() == appointment.id()) {
            return Err(StorageError::DuplicateId(appointment.id()).into());
        }
        appointments.push(appointment.clone());
        Ok(appointment)
    }
}

impl AppointmentRepository for InMemoryAppointmentRepository {
    fn save(
        &self,
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, BookingError>> + Send {
        future::ready(self.insert(appointment))
    }

    fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> impl Future<Output = Result<Option<Appointment>, BookingError>> + Send {
        future::ready(self.read(|all| all.iter().find(|a| a.id() == id).cloned()))
    }

    fn find_by_provider_and_range(
        &self,
        provider_id: &ProviderId,
        range: &TimeRange,
    ) -> impl Future<Output = Result<Option<Appointment>, BookingError>> + Send {
        future::ready(self.read(|all| {
            all.iter()
                .find(|a| a.conflicts_with(provider_id, range))
                .cloned()
        }))
    }

    fn find_all_by_client(
        &self,
        client_id: &ClientId,
    ) -> impl Future<Output = Result<Vec<Appointment>, BookingError>> + Send {
        future::ready(self.read(|all| {
            all.iter()
                .filter(|a| a.client_id() == client_id)
                .cloned()
                .collect()
        }))
    }
}
