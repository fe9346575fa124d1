//! `TimeRange` — a validated half-open interval `[start, end)`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::InvalidRangeError;

/// UTC instant marking either end of a [`TimeRange`].
pub type Timestamp = DateTime<Utc>;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// An immutable interval of time with an inclusive start and exclusive end.
///
/// Built only through [`TimeRange::new`] (new bookings) or
/// [`TimeRange::restore`] (ranges read back from storage), so
/// `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    start: Timestamp,
    end: Timestamp,
}

impl TimeRange {
    /// Build a range for a new booking, checked against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRangeError::StartNotBeforeEnd`] when `start >= end`
    /// and [`InvalidRangeError::StartInPast`] when `start` is before now.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, InvalidRangeError> {
        Self::new_at(start, end, Utc::now())
    }

    /// Same as [`TimeRange::new`] with an explicit notion of "now".
    ///
    /// # Errors
    ///
    /// See [`TimeRange::new`].
    pub fn new_at(
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    ) -> Result<Self, InvalidRangeError> {
        let range = Self::restore(start, end)?;
        if start < now {
            return Err(InvalidRangeError::StartInPast { start, now });
        }
        Ok(range)
    }

    /// Rebuild a range that was valid when it was first booked.
    ///
    /// The past-start rule only applies at creation, so stored ranges are
    /// only checked for ordering.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRangeError::StartNotBeforeEnd`] when `start >= end`.
    pub fn restore(start: Timestamp, end: Timestamp) -> Result<Self, InvalidRangeError> {
        if start >= end {
            return Err(InvalidRangeError::StartNotBeforeEnd { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Length of the range in whole minutes, rounded down.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_milliseconds() / MILLIS_PER_MINUTE
    }

    /// Whether the two ranges share at least one instant.
    ///
    /// Ranges that merely touch (`a.end == b.start`) do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}
