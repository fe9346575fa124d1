//! Booking service — the create-appointment use case and its queries.

use slotbook_domain::appointment::Appointment;
use slotbook_domain::error::{BookingError, NotFoundError, SlotConflictError};
use slotbook_domain::id::{AppointmentId, ClientId, ProviderId};
use slotbook_domain::time_range::{TimeRange, Timestamp};

use crate::ports::AppointmentRepository;
use crate::provider_locks::ProviderLocks;

/// Caller-supplied input for booking a slot.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub client_id: String,
    pub provider_id: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Application service enforcing "a provider never holds two overlapping
/// appointments".
pub struct BookingService<R> {
    repo: R,
    locks: ProviderLocks,
}

impl<R: AppointmentRepository> BookingService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            locks: ProviderLocks::default(),
        }
    }

    /// Book a slot for a client with a provider.
    ///
    /// The conflict check and the insert run inside the provider's critical
    /// section, so concurrent attempts for the same provider cannot both pass
    /// the check.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidRange`] when the range is malformed or in
    /// the past, [`BookingError::Validation`] for empty identifiers,
    /// [`BookingError::SlotConflict`] when the provider is already booked over
    /// an overlapping range, or a storage error from the repository.
    #[tracing::instrument(skip(self, request), fields(provider_id = %request.provider_id))]
    pub async fn create_appointment(
        &self,
        request: NewAppointment,
    ) -> Result<Appointment, BookingError> {
        let time_range = TimeRange::new(request.start, request.end)?;
        let client_id = ClientId::new(request.client_id)?;
        let provider_id = ProviderId::new(request.provider_id)?;

        let _guard = self.locks.lock(&provider_id).await;

        if let Some(existing) = self
            .repo
            .find_by_provider_and_range(&provider_id, &time_range)
            .await?
        {
            tracing::debug!(existing = %existing.id(), "slot already taken");
            return Err(SlotConflictError {
                existing: existing.id(),
            }
            .into());
        }

        let appointment =
            Appointment::new(AppointmentId::new(), client_id, provider_id, time_range);
        let saved = self.repo.save(appointment).await?;
        tracing::info!(appointment_id = %saved.id(), "appointment booked");
        Ok(saved)
    }

    /// Look up an appointment by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] when no appointment with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_appointment(&self, id: AppointmentId) -> Result<Appointment, BookingError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Appointment",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List a client's appointments in booking order.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] when `client_id` is empty, or a
    /// storage error from the repository.
    pub async fn list_client_appointments(
        &self,
        client_id: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        let client_id = ClientId::new(client_id)?;
        self.repo.find_all_by_client(&client_id).await
    }

    /// Find the appointment that would block `range` for `provider_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn find_conflict(
        &self,
        provider_id: &ProviderId,
        range: &TimeRange,
    ) -> Result<Option<Appointment>, BookingError> {
        self.repo.find_by_provider_and_range(provider_id, range).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use slotbook_domain::error::{InvalidRangeError, ValidationError};
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct InMemoryAppointmentRepo {
        store: Mutex<Vec<Appointment>>,
    }

    impl AppointmentRepository for InMemoryAppointmentRepo {
        fn save(
            &self,
            appointment: Appointment,
        ) -> impl Future<Output = Result<Appointment, BookingError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.push(appointment.clone());
            async { Ok(appointment) }
        }

        fn find_by_id(
            &self,
            id: AppointmentId,
        ) -> impl Future<Output = Result<Option<Appointment>, BookingError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.iter().find(|a| a.id() == id).cloned();
            async { Ok(result) }
        }

        fn find_by_provider_and_range(
            &self,
            provider_id: &ProviderId,
            range: &TimeRange,
        ) -> impl Future<Output = Result<Option<Appointment>, BookingError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store
                .iter()
                .find(|a| a.conflicts_with(provider_id, range))
                .cloned();
            async { Ok(result) }
        }

        fn find_all_by_client(
            &self,
            client_id: &ClientId,
        ) -> impl Future<Output = Result<Vec<Appointment>, BookingError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<Appointment> = store
                .iter()
                .filter(|a| a.client_id() == client_id)
                .cloned()
                .collect();
            async { Ok(result) }
        }
    }

    /// Repository that yields between the check and the insert, widening
    /// the window a missing lock would expose.
    #[derive(Default)]
    struct SlowRepo {
        inner: InMemoryAppointmentRepo,
    }

    impl AppointmentRepository for SlowRepo {
        async fn save(&self, appointment: Appointment) -> Result<Appointment, BookingError> {
            tokio::task::yield_now().await;
            self.inner.save(appointment).await
        }

        async fn find_by_id(&self, id: AppointmentId) -> Result<Option<Appointment>, BookingError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_provider_and_range(
            &self,
            provider_id: &ProviderId,
            range: &TimeRange,
        ) -> Result<Option<Appointment>, BookingError> {
            let found = self.inner.find_by_provider_and_range(provider_id, range).await;
            tokio::task::yield_now().await;
            found
        }

        async fn find_all_by_client(
            &self,
            client_id: &ClientId,
        ) -> Result<Vec<Appointment>, BookingError> {
            self.inner.find_all_by_client(client_id).await
        }
    }

    struct FailingRepo;

    fn unavailable() -> BookingError {
        BookingError::Storage(Box::new(std::io::Error::other("disk unavailable")))
    }

    impl AppointmentRepository for FailingRepo {
        async fn save(&self, _appointment: Appointment) -> Result<Appointment, BookingError> {
            Err(unavailable())
        }

        async fn find_by_id(&self, _id: AppointmentId) -> Result<Option<Appointment>, BookingError> {
            Err(unavailable())
        }

        async fn find_by_provider_and_range(
            &self,
            _provider_id: &ProviderId,
            _range: &TimeRange,
        ) -> Result<Option<Appointment>, BookingError> {
            Ok(None)
        }

        async fn find_all_by_client(
            &self,
            _client_id: &ClientId,
        ) -> Result<Vec<Appointment>, BookingError> {
            Err(unavailable())
        }
    }

    fn make_service() -> BookingService<InMemoryAppointmentRepo> {
        BookingService::new(InMemoryAppointmentRepo::default())
    }

    fn hours_from_now(hours: i64) -> DateTime<Utc> {
        Utc::now() + Duration::hours(hours)
    }

    fn request(
        client: &str,
        provider: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> NewAppointment {
        NewAppointment {
            client_id: client.to_string(),
            provider_id: provider.to_string(),
            start,
            end,
        }
    }

    #[tokio::test]
    async fn should_book_appointment_when_slot_is_free() {
        let svc = make_service();
        let (start, end) = (hours_from_now(1), hours_from_now(2));

        let booked = svc
            .create_appointment(request("client-a", "provider-x", start, end))
            .await
            .unwrap();

        assert_eq!(booked.client_id().as_str(), "client-a");
        assert_eq!(booked.provider_id().as_str(), "provider-x");
        assert_eq!(booked.time_range().start(), start);
        let fetched = svc.get_appointment(booked.id()).await.unwrap();
        assert_eq!(fetched, booked);
    }

    #[tokio::test]
    async fn should_reject_second_booking_of_identical_slot() {
        let svc = make_service();
        let (start, end) = (hours_from_now(1), hours_from_now(2));

        let first = svc
            .create_appointment(request("client-a", "provider-x", start, end))
            .await
            .unwrap();
        let second = svc
            .create_appointment(request("client-b", "provider-x", start, end))
            .await;

        match second {
            Err(BookingError::SlotConflict(err)) => assert_eq!(err.existing, first.id()),
            other => panic!("expected slot conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_reject_booking_when_range_overlaps_existing() {
        let svc = make_service();
        let ten = hours_from_now(10);
        svc.create_appointment(request("client-a", "provider-x", ten, ten + Duration::hours(1)))
            .await
            .unwrap();

        let result = svc
            .create_appointment(request(
                "client-b",
                "provider-x",
                ten + Duration::minutes(30),
                ten + Duration::minutes(90),
            ))
            .await;
        assert!(matches!(result, Err(BookingError::SlotConflict(_))));
    }

    #[tokio::test]
    async fn should_accept_booking_when_range_touches_existing() {
        let svc = make_service();
        let ten = hours_from_now(10);
        let eleven = ten + Duration::hours(1);
        svc.create_appointment(request("client-a", "provider-x", ten, eleven))
            .await
            .unwrap();

        let result = svc
            .create_appointment(request(
                "client-b",
                "provider-x",
                eleven,
                eleven + Duration::hours(1),
            ))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_accept_same_slot_for_different_provider() {
        let svc = make_service();
        let (start, end) = (hours_from_now(1), hours_from_now(2));
        svc.create_appointment(request("client-a", "provider-x", start, end))
            .await
            .unwrap();

        let result = svc
            .create_appointment(request("client-b", "provider-y", start, end))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_propagate_invalid_range_before_touching_store() {
        let svc = BookingService::new(FailingRepo);
        let start = hours_from_now(2);

        let result = svc
            .create_appointment(request("client-a", "provider-x", start, start))
            .await;
        assert!(matches!(
            result,
            Err(BookingError::InvalidRange(
                InvalidRangeError::StartNotBeforeEnd { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn should_reject_booking_in_the_past() {
        let svc = make_service();
        let result = svc
            .create_appointment(request(
                "client-a",
                "provider-x",
                hours_from_now(-2),
                hours_from_now(-1),
            ))
            .await;
        assert!(matches!(
            result,
            Err(BookingError::InvalidRange(InvalidRangeError::StartInPast { .. }))
        ));
    }

    #[tokio::test]
    async fn should_reject_empty_client_id() {
        let svc = make_service();
        let result = svc
            .create_appointment(request("", "provider-x", hours_from_now(1), hours_from_now(2)))
            .await;
        assert!(matches!(
            result,
            Err(BookingError::Validation(ValidationError::EmptyClientId))
        ));
    }

    #[tokio::test]
    async fn should_reject_empty_provider_id() {
        let svc = make_service();
        let result = svc
            .create_appointment(request("client-a", "", hours_from_now(1), hours_from_now(2)))
            .await;
        assert!(matches!(
            result,
            Err(BookingError::Validation(ValidationError::EmptyProviderId))
        ));
    }

    #[tokio::test]
    async fn should_propagate_storage_error_from_save() {
        let svc = BookingService::new(FailingRepo);
        let result = svc
            .create_appointment(request(
                "client-a",
                "provider-x",
                hours_from_now(1),
                hours_from_now(2),
            ))
            .await;
        assert!(matches!(result, Err(BookingError::Storage(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_when_appointment_missing() {
        let svc = make_service();
        let result = svc.get_appointment(AppointmentId::new()).await;
        assert!(matches!(result, Err(BookingError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_client_appointments_in_booking_order() {
        let svc = make_service();
        let mut expected = Vec::new();
        for (hour, provider) in [(5, "provider-x"), (1, "provider-y"), (3, "provider-z")] {
            let booked = svc
                .create_appointment(request(
                    "client-a",
                    provider,
                    hours_from_now(hour),
                    hours_from_now(hour + 1),
                ))
                .await
                .unwrap();
            expected.push(booked.id());
        }
        svc.create_appointment(request(
            "client-b",
            "provider-x",
            hours_from_now(8),
            hours_from_now(9),
        ))
        .await
        .unwrap();

        let listed: Vec<AppointmentId> = svc
            .list_client_appointments("client-a")
            .await
            .unwrap()
            .iter()
            .map(Appointment::id)
            .collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn should_return_empty_list_for_unknown_client() {
        let svc = make_service();
        let listed = svc.list_client_appointments("nobody").await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn should_find_conflict_for_overlapping_range() {
        let svc = make_service();
        let booked = svc
            .create_appointment(request(
                "client-a",
                "provider-x",
                hours_from_now(1),
                hours_from_now(3),
            ))
            .await
            .unwrap();

        let provider = ProviderId::new("provider-x").unwrap();
        let query = TimeRange::new(hours_from_now(2), hours_from_now(4)).unwrap();
        let found = svc.find_conflict(&provider, &query).await.unwrap();
        assert_eq!(found.map(|a| a.id()), Some(booked.id()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn should_allow_exactly_one_winner_under_concurrent_bookings() {
        let svc = Arc::new(BookingService::new(SlowRepo::default()));
        let start = hours_from_now(1);
        let attempts = 32;

        let mut handles = Vec::with_capacity(attempts);
        for i in 0..attempts {
            let svc = Arc::clone(&svc);
            // alternate identical and shifted-but-overlapping ranges
            let offset = Duration::minutes(i64::try_from(i % 2).unwrap() * 15);
            handles.push(tokio::spawn(async move {
                svc.create_appointment(request(
                    &format!("client-{i}"),
                    "provider-x",
                    start + offset,
                    start + offset + Duration::hours(1),
                ))
                .await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(BookingError::SlotConflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, attempts - 1);
    }
}
