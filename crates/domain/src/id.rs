//! Typed identifiers.
//!
//! Appointment ids are system-generated UUIDs. Client and provider ids are
//! opaque, caller-supplied strings that only need to be non-empty.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;

macro_rules! define_key {
    ($(#[doc = $doc:expr])* $name:ident, $empty:expr) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a caller-supplied identifier.
            ///
            /// # Errors
            ///
            /// Returns a [`ValidationError`] when `value` is empty or blank.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err($empty);
                }
                Ok(Self(value))
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

/// Unique identifier for an [`Appointment`](crate::appointment::Appointment),
/// generated when the booking is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AppointmentId(uuid::Uuid);

impl Default for AppointmentId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AppointmentId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for AppointmentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

define_key!(
    /// Identifier of the client who books an appointment.
    ClientId,
    ValidationError::EmptyClientId
);

define_key!(
    /// Identifier of the provider an appointment is booked with.
    ProviderId,
    ValidationError::EmptyProviderId
);
