use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_models::{Appointment, Doctor, NewDoctor};
use shared_utils::validation::{is_present, missing_fields, validate_email};

use crate::services::slots::{WORKING_DAY_END_HOUR, WORKING_DAY_START_HOUR};

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl CreateDoctorRequest {
    pub fn validate(self) -> Result<NewDoctor, DoctorError> {
        let missing = missing_fields(&[
            ("firstName", is_present(&self.first_name)),
            ("lastName", is_present(&self.last_name)),
            ("email", is_present(&self.email)),
        ]);

        let (Some(first_name), Some(last_name), Some(email)) = (self.first_name, self.last_name, self.email)
        else {
            return Err(DoctorError::MissingFields(missing));
        };
        if !missing.is_empty() {
            return Err(DoctorError::MissingFields(missing));
        }

        let email = email.trim().to_string();
        if !validate_email(&email) {
            return Err(DoctorError::ValidationError(format!("Invalid email address: {}", email)));
        }

        Ok(NewDoctor {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsQuery {
    pub doctor_id: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: format!("{:02}:00", WORKING_DAY_START_HOUR),
            end: format!("{:02}:00", WORKING_DAY_END_HOUR),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsResponse {
    pub date: NaiveDate,
    pub available_slots: Vec<DateTime<Utc>>,
    pub timezone: String,
    pub working_hours: WorkingHours,
}

/// An hour-aligned start within a doctor's working day. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayScheduleResponse {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
    pub timezone: String,
    pub working_hours: WorkingHours,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDetails {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub appointments: Vec<Appointment>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor with email {email} already exists")]
    EmailAlreadyExists { email: String },

    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<String>),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for DoctorError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { .. } => DoctorError::NotFound,
            StoreError::Duplicate { field } => {
                DoctorError::ValidationError(format!("Duplicate value for {}", field))
            }
            StoreError::Backend(msg) => DoctorError::DatabaseError(msg),
        }
    }
}

impl From<DoctorError> for AppError {
    fn from(error: DoctorError) -> Self {
        match error {
            DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
            DoctorError::EmailAlreadyExists { .. } => {
                AppError::BadRequest("A doctor with this email already exists".to_string())
            }
            DoctorError::MissingFields(missing) => AppError::MissingFields {
                message: "First name, last name, and email are required".to_string(),
                missing,
            },
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
