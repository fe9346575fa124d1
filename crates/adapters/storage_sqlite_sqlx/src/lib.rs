//! # slotbook-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement `AppointmentRepository` from `slotbook-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `slotbook-app` (for port traits) and `slotbook-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod appointment_repo;
pub mod error;
pub mod pool;

pub use appointment_repo::SqliteAppointmentRepository;
pub use error::StorageError;
pub use pool::Config;
