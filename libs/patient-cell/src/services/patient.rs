use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{AppState, ClinicStore};
use shared_models::{AppointmentFilter, Patient};

use crate::models::{CreatePatientRequest, PatientDetails, PatientError};

pub struct PatientService {
    store: Arc<dyn ClinicStore>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        let new_patient = request.validate()?;
        debug!("Creating new patient profile for: {}", new_patient.email);

        let patient = self.store.create_patient(new_patient).await?;

        info!("Patient profile created successfully with ID: {}", patient.id);
        Ok(patient)
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        Ok(self.store.list_patients().await?)
    }

    /// Exact phone lookup, with the patient's appointment history attached.
    pub async fn find_by_phone(&self, phone: &str) -> Result<PatientDetails, PatientError> {
        debug!("Searching patient by phone: {}", phone);

        let patient = self
            .store
            .find_patient_by_phone(phone.trim())
            .await?
            .ok_or(PatientError::NotFound)?;

        let appointments = self
            .store
            .list_appointments(&AppointmentFilter::for_patient(patient.id))
            .await?;

        Ok(PatientDetails { patient, appointments })
    }
}
