use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use shared_models::{
    Appointment, AppointmentChanges, AppointmentFilter, Doctor, NewAppointment, NewDoctor,
    NewPatient, Patient,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("duplicate value for unique field {field}")]
    Duplicate { field: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Storage handle shared by every request. Implementations own the records;
/// callers only ever see snapshots.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    /// Short name used in health reports and logs.
    fn backend_name(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn create_patient(&self, patient: NewPatient) -> Result<Patient, StoreError>;
    async fn list_patients(&self) -> Result<Vec<Patient>, StoreError>;
    async fn find_patient(&self, id: Uuid) -> Result<Option<Patient>, StoreError>;
    async fn find_patient_by_phone(&self, phone: &str) -> Result<Option<Patient>, StoreError>;

    async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError>;
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError>;
    async fn find_doctor(&self, id: Uuid) -> Result<Option<Doctor>, StoreError>;

    /// Persists a new SCHEDULED appointment.
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Appointment, StoreError>;
    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;
    /// Matching appointments, ascending by `datetime`.
    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, StoreError>;
    async fn update_appointment(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> Result<Appointment, StoreError>;
    async fn delete_appointment(&self, id: Uuid) -> Result<(), StoreError>;
}
