// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_models::{Appointment, AppointmentStatus, Doctor, NewAppointment, Patient};
use shared_utils::validation::{is_present, missing_fields};

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

const CREATE_REQUIRED_MESSAGE: &str = "Doctor ID, patient ID, and datetime are required";
const RESCHEDULE_REQUIRED_MESSAGE: &str = "Datetime is required";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub doctor_id: Option<String>,
    pub patient_id: Option<String>,
    pub datetime: Option<String>,
}

impl CreateAppointmentRequest {
    pub fn validate(self) -> Result<NewAppointment, AppointmentError> {
        let missing = missing_fields(&[
            ("doctorId", is_present(&self.doctor_id)),
            ("patientId", is_present(&self.patient_id)),
            ("datetime", is_present(&self.datetime)),
        ]);

        let (Some(doctor_id), Some(patient_id), Some(datetime)) = (self.doctor_id, self.patient_id, self.datetime)
        else {
            return Err(AppointmentError::missing(CREATE_REQUIRED_MESSAGE, missing));
        };
        if !missing.is_empty() {
            return Err(AppointmentError::missing(CREATE_REQUIRED_MESSAGE, missing));
        }

        Ok(NewAppointment {
            doctor_id: parse_id("doctorId", &doctor_id)?,
            patient_id: parse_id("patientId", &patient_id)?,
            datetime: parse_instant(&datetime)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub datetime: Option<String>,
}

impl RescheduleAppointmentRequest {
    pub fn validate(self) -> Result<DateTime<Utc>, AppointmentError> {
        match self.datetime {
            Some(datetime) if !datetime.trim().is_empty() => parse_instant(&datetime),
            _ => Err(AppointmentError::missing(RESCHEDULE_REQUIRED_MESSAGE, vec!["datetime".to_string()])),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentDateQuery {
    pub date: Option<String>,
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppointmentError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppointmentError::ValidationError(format!("{} must be a valid UUID", field)))
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, AppointmentError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| AppointmentError::InvalidTime(format!("'{}' is not an RFC 3339 instant", raw.trim())))
}

// ==============================================================================
// RESPONSE MODELS
// ==============================================================================

/// An appointment with its doctor and patient attached, when they still exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub doctor: Option<Doctor>,
    pub patient: Option<Patient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentsByDateResponse {
    pub date: NaiveDate,
    pub total: usize,
    pub appointments: Vec<AppointmentDetails>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor is not available at this time")]
    DoctorNotAvailable,

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("{message}")]
    MissingFields { message: String, missing: Vec<String> },

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl AppointmentError {
    fn missing(message: &str, missing: Vec<String>) -> Self {
        AppointmentError::MissingFields {
            message: message.to_string(),
            missing,
        }
    }
}

impl From<StoreError> for AppointmentError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { .. } => AppointmentError::NotFound,
            StoreError::Duplicate { field } => {
                AppointmentError::ValidationError(format!("Duplicate value for {}", field))
            }
            StoreError::Backend(msg) => AppointmentError::DatabaseError(msg),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(error: AppointmentError) -> Self {
        match error {
            AppointmentError::NotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::PatientNotFound => AppError::NotFound(error.to_string()),
            AppointmentError::DoctorNotAvailable | AppointmentError::InvalidStatusTransition { .. } => {
                AppError::BadRequest(error.to_string())
            }
            AppointmentError::MissingFields { message, missing } => AppError::MissingFields { message, missing },
            AppointmentError::InvalidTime(msg) | AppointmentError::ValidationError(msg) => {
                AppError::ValidationError(msg)
            }
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
