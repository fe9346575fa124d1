//! # slotbook-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **Booking Store** port that storage adapters implement:
//!   - `AppointmentRepository` — save, look up by id, find a provider
//!     conflict, list a client's appointments
//! - Define the **driving/inbound** use case:
//!   - `BookingService` — create an appointment (check + insert under the
//!     provider's critical section), get, list by client
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (`ProviderLocks`)
//!
//! ## Dependency rule
//! Depends on `slotbook-domain` only (plus `tokio::sync` for locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod provider_locks;
pub mod services;
