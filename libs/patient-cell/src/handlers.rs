use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, PatientSearchQuery};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePatientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(request) = payload?;
    let service = PatientService::new(&state);

    let patient = service.create_patient(request).await?;

    Ok((StatusCode::CREATED, Json(json!(patient))))
}

#[axum::debug_handler]
pub async fn list_patients(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);

    let patients = service.list_patients().await?;

    Ok(Json(json!(patients)))
}

#[axum::debug_handler]
pub async fn search_patient_by_phone(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let phone = query
        .phone
        .filter(|phone| !phone.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Phone number is required".to_string()))?;

    let service = PatientService::new(&state);
    let patient = service.find_by_phone(&phone).await?;

    Ok(Json(json!(patient)))
}
