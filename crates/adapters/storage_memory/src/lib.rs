//! # slotbook-adapter-storage-memory
//!
//! Process-local Booking Store.
//!
//! ## Responsibilities
//! - Implement `AppointmentRepository` from `slotbook-app::ports::storage`
//! - Keep appointments in insertion order for the lifetime of the process
//!
//! ## Dependency rule
//! Depends on `slotbook-app` (for port traits) and `slotbook-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod appointment_repo;
pub mod error;

pub use appointment_repo::InMemoryAppointmentRepository;
pub use error::StorageError;
