//! Shared application state for axum handlers.

use std::sync::Arc;

use slotbook_app::ports::AppointmentRepository;
use slotbook_app::services::booking_service::BookingService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repository itself does not need
/// to be `Clone` — only the `Arc` wrapper is cloned.
pub struct AppState<R> {
    /// Booking use case, shared by every request.
    pub booking_service: Arc<BookingService<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            booking_service: Arc::clone(&self.booking_service),
        }
    }
}

impl<R> AppState<R>
where
    R: AppointmentRepository + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(booking_service: BookingService<R>) -> Self {
        Self {
            booking_service: Arc::new(booking_service),
        }
    }
}
