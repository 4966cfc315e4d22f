use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, Doctor, NewAppointment,
    NewDoctor, NewPatient, Patient,
};

use crate::store::{ClinicStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    patients: Vec<Patient>,
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
}

/// In-process store with the same uniqueness rules as the database schema.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let _tables = self.tables.read().await;
        Ok(())
    }

    async fn create_patient(&self, patient: NewPatient) -> Result<Patient, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.patients.iter().any(|p| p.email.eq_ignore_ascii_case(&patient.email)) {
            return Err(StoreError::Duplicate { field: "email".to_string() });
        }
        if tables.patients.iter().any(|p| p.phone == patient.phone) {
            return Err(StoreError::Duplicate { field: "phone".to_string() });
        }

        let now = Utc::now();
        let created = Patient {
            id: Uuid::new_v4(),
            first_name: patient.first_name,
            last_name: patient.last_name,
            email: patient.email,
            phone: patient.phone,
            date_of_birth: patient.date_of_birth,
            created_at: now,
            updated_at: now,
        };
        tables.patients.push(created.clone());
        debug!("Stored patient {}", created.id);

        Ok(created)
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, StoreError> {
        Ok(self.tables.read().await.patients.clone())
    }

    async fn find_patient(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.patients.iter().find(|p| p.id == id).cloned())
    }

    async fn find_patient_by_phone(&self, phone: &str) -> Result<Option<Patient>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.patients.iter().find(|p| p.phone == phone).cloned())
    }

    async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.doctors.iter().any(|d| d.email.eq_ignore_ascii_case(&doctor.email)) {
            return Err(StoreError::Duplicate { field: "email".to_string() });
        }

        let now = Utc::now();
        let created = Doctor {
            id: Uuid::new_v4(),
            first_name: doctor.first_name,
            last_name: doctor.last_name,
            email: doctor.email,
            created_at: now,
            updated_at: now,
        };
        tables.doctors.push(created.clone());
        debug!("Stored doctor {}", created.id);

        Ok(created)
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        Ok(self.tables.read().await.doctors.clone())
    }

    async fn find_doctor(&self, id: Uuid) -> Result<Option<Doctor>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.doctors.iter().find(|d| d.id == id).cloned())
    }

    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let created = Appointment {
            id: Uuid::new_v4(),
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            datetime: appointment.datetime,
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        tables.appointments.push(created.clone());
        debug!("Stored appointment {}", created.id);

        Ok(created)
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.datetime);

        Ok(appointments)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.write().await;
        let appointment = tables
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound { entity: "Appointment" })?;

        if let Some(datetime) = changes.datetime {
            appointment.datetime = datetime;
        }
        if let Some(status) = changes.status {
            appointment.status = status;
        }
        appointment.updated_at = Utc::now();

        Ok(appointment.clone())
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.appointments.len();
        tables.appointments.retain(|a| a.id != id);

        if tables.appointments.len() == before {
            return Err(StoreError::NotFound { entity: "Appointment" });
        }
        Ok(())
    }
}
