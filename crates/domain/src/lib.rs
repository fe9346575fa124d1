//! # slotbook-domain
//!
//! Pure domain model for the slotbook appointment-booking service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **`TimeRange`** (validated half-open interval `[start, end)`) and its `Timestamp`
//! - Define **`Appointment`** (a client booked with a provider over a range)
//! - Own the overlap rule that decides whether two bookings collide
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! The Booking Store boundary is expressed as a trait in the `app` crate (port).

pub mod error;
pub mod id;

pub mod appointment;
pub mod time_range;
