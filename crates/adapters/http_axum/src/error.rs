//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use slotbook_domain::error::BookingError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`BookingError`] and request-decoding failures to HTTP responses.
pub enum ApiError {
    Booking(BookingError),
    Payload(JsonRejection),
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        Self::Booking(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Payload(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Payload(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text()),
            Self::Booking(err) => match err {
                BookingError::InvalidRange(_)
                | BookingError::SlotConflict(_)
                | BookingError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                BookingError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                BookingError::Storage(err) => {
                    tracing::error!(error = %err, "storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
