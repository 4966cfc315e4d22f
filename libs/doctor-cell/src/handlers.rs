use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::error::AppError;
use shared_utils::validation::parse_date_param;

use crate::models::{
    AvailableSlotsQuery, AvailableSlotsResponse, CreateDoctorRequest, DayScheduleResponse,
    ScheduleQuery, WorkingHours,
};
use crate::services::DoctorService;

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateDoctorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(request) = payload?;
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.create_doctor(request).await?;

    Ok((StatusCode::CREATED, Json(json!(doctor))))
}

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors().await?;

    Ok(Json(json!(doctors)))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    doctor_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(doctor_id) = doctor_id?;
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(doctor_id).await?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let required = || AppError::BadRequest("Doctor ID and date are required".to_string());

    let doctor_id = query.doctor_id.filter(|id| !id.trim().is_empty()).ok_or_else(required)?;
    let date = query.date.filter(|date| !date.trim().is_empty()).ok_or_else(required)?;

    let doctor_id = Uuid::parse_str(doctor_id.trim())
        .map_err(|_| AppError::ValidationError("Invalid doctor ID".to_string()))?;
    let day = parse_date_param(&date)
        .ok_or_else(|| AppError::ValidationError("Valid date is required".to_string()))?;

    let doctor_service = DoctorService::new(&state);
    let slots = doctor_service.get_available_slots(doctor_id, day).await?;

    Ok(Json(AvailableSlotsResponse {
        date: day,
        available_slots: slots.to_vec(),
        timezone: "UTC".to_string(),
        working_hours: WorkingHours::default(),
    }))
}

#[axum::debug_handler]
pub async fn get_doctor_schedule(
    State(state): State<Arc<AppState>>,
    doctor_id: Result<Path<Uuid>, PathRejection>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<DayScheduleResponse>, AppError> {
    let Path(doctor_id) = doctor_id?;
    let day = query
        .date
        .as_deref()
        .and_then(parse_date_param)
        .ok_or_else(|| AppError::ValidationError("Valid date is required".to_string()))?;

    let doctor_service = DoctorService::new(&state);
    let slots = doctor_service.get_day_schedule(doctor_id, day).await?;

    Ok(Json(DayScheduleResponse {
        doctor_id,
        date: day,
        slots,
        timezone: "UTC".to_string(),
        working_hours: WorkingHours::default(),
    }))
}
