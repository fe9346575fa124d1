//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod appointments;

use axum::Router;
use axum::routing::{get, post};

use slotbook_app::ports::AppointmentRepository;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: AppointmentRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/appointments", post(appointments::create::<R>))
        .route("/appointments/{id}", get(appointments::get::<R>))
        .route(
            "/clients/{client_id}/appointments",
            get(appointments::list_by_client::<R>),
        )
}
