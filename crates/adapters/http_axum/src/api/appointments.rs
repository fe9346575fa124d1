//! JSON REST handlers for appointments.

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use slotbook_app::ports::AppointmentRepository;
use slotbook_app::services::booking_service::NewAppointment;
use slotbook_domain::appointment::Appointment;
use slotbook_domain::error::{BookingError, ValidationError};
use slotbook_domain::id::AppointmentId;
use slotbook_domain::time_range::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for booking an appointment.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub client_id: String,
    pub provider_id: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Confirmation returned once an appointment is booked.
#[derive(Serialize)]
pub struct Confirmation {
    pub id: AppointmentId,
    pub message: &'static str,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Confirmation>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Appointment>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Appointment>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/appointments`
pub async fn create<R>(
    State(state): State<AppState<R>>,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    R: AppointmentRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let appointment = state
        .booking_service
        .create_appointment(NewAppointment {
            client_id: req.client_id,
            provider_id: req.provider_id,
            start: req.start,
            end: req.end,
        })
        .await?;

    Ok(CreateResponse::Created(Json(Confirmation {
        id: appointment.id(),
        message: "Appointment created successfully",
    })))
}

/// `GET /api/appointments/:id`
pub async fn get<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: AppointmentRepository + Send + Sync + 'static,
{
    let appointment_id = AppointmentId::from_str(&id)
        .map_err(|_| BookingError::from(ValidationError::MalformedAppointmentId(id)))?;
    let appointment = state.booking_service.get_appointment(appointment_id).await?;
    Ok(GetResponse::Ok(Json(appointment)))
}

/// `GET /api/clients/:client_id/appointments`
pub async fn list_by_client<R>(
    State(state): State<AppState<R>>,
    Path(client_id): Path<String>,
) -> Result<ListResponse, ApiError>
where
    R: AppointmentRepository + Send + Sync + 'static,
{
    let appointments = state
        .booking_service
        .list_client_appointments(&client_id)
        .await?;
    Ok(ListResponse::Ok(Json(appointments)))
}
