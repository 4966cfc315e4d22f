use serde::{Deserialize, Serialize};

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_models::{Appointment, NewPatient, Patient};
use shared_utils::validation::{is_present, missing_fields, parse_date_param, validate_email, validate_phone};

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Registration payload. Every field is optional here so that absent ones can be reported together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
}

impl CreatePatientRequest {
    pub fn validate(self) -> Result<NewPatient, PatientError> {
        let missing = missing_fields(&[
            ("firstName", is_present(&self.first_name)),
            ("lastName", is_present(&self.last_name)),
            ("email", is_present(&self.email)),
            ("phone", is_present(&self.phone)),
            ("dateOfBirth", is_present(&self.date_of_birth)),
        ]);
        if !missing.is_empty() {
            return Err(PatientError::MissingFields(missing));
        }

        let (Some(first_name), Some(last_name), Some(email), Some(phone), Some(date_of_birth)) = (
            self.first_name,
            self.last_name,
            self.email,
            self.phone,
            self.date_of_birth,
        ) else {
            return Err(PatientError::MissingFields(missing));
        };

        let email = email.trim().to_string();
        if !validate_email(&email) {
            return Err(PatientError::ValidationError(format!("Invalid email address: {}", email)));
        }

        let phone = phone.trim().to_string();
        if !validate_phone(&phone) {
            return Err(PatientError::ValidationError(format!("Invalid phone number: {}", phone)));
        }

        let date_of_birth = parse_date_param(&date_of_birth).ok_or_else(|| {
            PatientError::ValidationError("Date of birth must be a valid date".to_string())
        })?;

        Ok(NewPatient {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email,
            phone,
            date_of_birth,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientSearchQuery {
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetails {
    #[serde(flatten)]
    pub patient: Patient,
    pub appointments: Vec<Appointment>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Patient with this {field} already exists")]
    AlreadyExists { field: String },

    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<String>),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for PatientError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { .. } => PatientError::NotFound,
            StoreError::Duplicate { field } => PatientError::AlreadyExists { field },
            StoreError::Backend(msg) => PatientError::DatabaseError(msg),
        }
    }
}

impl From<PatientError> for AppError {
    fn from(error: PatientError) -> Self {
        match error {
            PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
            PatientError::AlreadyExists { field } => AppError::BadRequest(format!(
                "A patient with this {} already exists",
                field
            )),
            PatientError::MissingFields(missing) => AppError::MissingFields {
                message: "All fields are required".to_string(),
                missing,
            },
            PatientError::ValidationError(msg) => AppError::ValidationError(msg),
            PatientError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn complete_request() -> CreatePatientRequest {
        CreatePatientRequest {
            first_name: Some(" Ana ".to_string()),
            last_name: Some("Lopez".to_string()),
            email: Some("ana@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            date_of_birth: Some("1990-04-02".to_string()),
        }
    }

    #[test]
    fn validate_trims_and_parses_birth_date() {
        let patient = complete_request().validate().unwrap();
        assert_eq!(patient.first_name, "Ana");
        assert_eq!(patient.date_of_birth, NaiveDate::from_ymd_opt(1990, 4, 2).unwrap());
    }

    #[test]
    fn validate_lists_every_missing_field() {
        let request = CreatePatientRequest {
            first_name: Some("Ana".to_string()),
            email: Some("   ".to_string()),
            ..Default::default()
        };

        assert_matches!(
            request.validate(),
            Err(PatientError::MissingFields(missing))
                if missing == vec!["lastName", "email", "phone", "dateOfBirth"]
        );
    }

    #[test]
    fn validate_rejects_malformed_values() {
        let bad_email = CreatePatientRequest {
            email: Some("nope".to_string()),
            ..complete_request()
        };
        assert_matches!(bad_email.validate(), Err(PatientError::ValidationError(_)));

        let bad_birth_date = CreatePatientRequest {
            date_of_birth: Some("yesterday".to_string()),
            ..complete_request()
        };
        assert_matches!(bad_birth_date.validate(), Err(PatientError::ValidationError(_)));
    }

    #[test]
    fn duplicate_field_is_named_in_the_response() {
        let error: AppError = PatientError::from(StoreError::Duplicate {
            field: "phone".to_string(),
        })
        .into();
        assert_eq!(error.to_string(), "Bad Request: A patient with this phone already exists");
    }
}
