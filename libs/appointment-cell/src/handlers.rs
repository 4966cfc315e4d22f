// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::error::AppError;
use shared_utils::validation::parse_date_param;

use crate::models::{
    AppointmentDateQuery, AppointmentDetails, AppointmentsByDateResponse, CreateAppointmentRequest,
    RescheduleAppointmentRequest,
};
use crate::services::booking::AppointmentBookingService;

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AppointmentDetails>), AppError> {
    let Json(request) = payload?;
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.create_appointment(request).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// With `?date=` the day's appointments are wrapped with the date and a count;
/// without it every appointment is returned as a plain array.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentDateQuery>,
) -> Result<Response, AppError> {
    match query.date {
        Some(date) => Ok(appointments_on(&state, &date).await?.into_response()),
        None => {
            let booking_service = AppointmentBookingService::new(&state);
            let appointments = booking_service.list_all().await?;
            Ok(Json(appointments).into_response())
        }
    }
}

#[axum::debug_handler]
pub async fn list_appointments_by_date(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentDateQuery>,
) -> Result<Json<AppointmentsByDateResponse>, AppError> {
    let date = query.date.unwrap_or_default();
    appointments_on(&state, &date).await
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    appointment_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AppointmentDetails>, AppError> {
    let Path(appointment_id) = appointment_id?;
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.get_appointment(appointment_id).await?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<AppState>>,
    appointment_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RescheduleAppointmentRequest>, JsonRejection>,
) -> Result<Json<AppointmentDetails>, AppError> {
    let Path(appointment_id) = appointment_id?;
    let Json(request) = payload?;
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.reschedule_appointment(appointment_id, request).await?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    appointment_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AppointmentDetails>, AppError> {
    let Path(appointment_id) = appointment_id?;
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service.cancel_appointment(appointment_id).await?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    appointment_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(appointment_id) = appointment_id?;
    let booking_service = AppointmentBookingService::new(&state);

    booking_service.delete_appointment(appointment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn appointments_on(state: &AppState, date: &str) -> Result<Json<AppointmentsByDateResponse>, AppError> {
    let day = parse_date_param(date)
        .ok_or_else(|| AppError::ValidationError("Valid date is required".to_string()))?;

    let booking_service = AppointmentBookingService::new(state);
    let appointments = booking_service.list_by_date(day).await?;

    Ok(Json(AppointmentsByDateResponse {
        date: day,
        total: appointments.len(),
        appointments,
    }))
}
