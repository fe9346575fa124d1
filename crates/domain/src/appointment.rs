//! Appointment — a client booked with a provider over a [`TimeRange`].

use serde::Serialize;

use crate::id::{AppointmentId, ClientId, ProviderId};
use crate::time_range::TimeRange;

/// An immutable booking record.
///
/// Identifier validity and range validity are enforced by the
/// [`ClientId`], [`ProviderId`] and [`TimeRange`] constructors, so an
/// `Appointment` can only be assembled from already-valid parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    id: AppointmentId,
    client_id: ClientId,
    provider_id: ProviderId,
    time_range: TimeRange,
}

impl Appointment {
    #[must_use]
    pub fn new(
        id: AppointmentId,
        client_id: ClientId,
        provider_id: ProviderId,
        time_range: TimeRange,
    ) -> Self {
        Self {
            id,
            client_id,
            provider_id,
            time_range,
        }
    }

    #[must_use]
    pub fn id(&self) -> AppointmentId {
        self.id
    }

    #[must_use]
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    #[must_use]
    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    #[must_use]
    pub fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    /// Whether booking `range` with `provider_id` would collide with this appointment.
    #[must_use]
    pub fn conflicts_with(&self, provider_id: &ProviderId, range: &TimeRange) -> bool {
        self.provider_id == *provider_id && self.time_range.overlaps(range)
    }
}
