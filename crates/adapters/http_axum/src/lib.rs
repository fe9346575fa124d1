//! # slotbook-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small JSON API for booking and querying appointments
//!   (`POST /api/appointments`, `GET /api/appointments/{id}`,
//!   `GET /api/clients/{client_id}/appointments`)
//! - Map HTTP requests into `BookingService` calls (driving adapter)
//! - Map domain errors into HTTP status codes and `{"error": ...}` bodies
//!
//! ## Dependency rule
//! Depends on `slotbook-app` (for port traits and services) and `slotbook-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
