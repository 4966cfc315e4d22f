use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{AppState, ClinicStore, StoreError};
use shared_models::{AppointmentFilter, AppointmentStatus, Doctor};

use crate::models::{CreateDoctorRequest, DoctorDetails, DoctorError, TimeSlot};
use crate::services::slots::{available_slots, day_schedule, working_day, AvailableSlots};

pub struct DoctorService {
    store: Arc<dyn ClinicStore>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Create a new doctor profile
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        let new_doctor = request.validate()?;
        debug!("Creating new doctor profile for: {}", new_doctor.email);

        let email = new_doctor.email.clone();
        let doctor = self.store.create_doctor(new_doctor).await.map_err(|e| match e {
            StoreError::Duplicate { .. } => DoctorError::EmailAlreadyExists { email },
            other => other.into(),
        })?;

        info!("Doctor profile created successfully with ID: {}", doctor.id);
        Ok(doctor)
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        Ok(self.store.list_doctors().await?)
    }

    /// Doctor profile together with every appointment booked with them.
    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<DoctorDetails, DoctorError> {
        debug!("Fetching doctor profile: {}", doctor_id);

        let doctor = self.find_doctor(doctor_id).await?;
        let appointments = self
            .store
            .list_appointments(&AppointmentFilter::for_doctor(doctor_id))
            .await?;

        Ok(DoctorDetails { doctor, appointments })
    }

    pub async fn get_available_slots(
        &self,
        doctor_id: Uuid,
        day: NaiveDate,
    ) -> Result<AvailableSlots, DoctorError> {
        self.find_doctor(doctor_id).await?;
        let booked = self.booked_instants(doctor_id, day).await?;
        Ok(available_slots(day, booked))
    }

    pub async fn get_day_schedule(&self, doctor_id: Uuid, day: NaiveDate) -> Result<Vec<TimeSlot>, DoctorError> {
        self.find_doctor(doctor_id).await?;
        let booked = self.booked_instants(doctor_id, day).await?;
        Ok(day_schedule(day, booked))
    }

    async fn find_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        self.store
            .find_doctor(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)
    }

    /// Start instants of the doctor's SCHEDULED appointments inside the working day.
    async fn booked_instants(
        &self,
        doctor_id: Uuid,
        day: NaiveDate,
    ) -> Result<Vec<DateTime<Utc>>, DoctorError> {
        let (start, end) = working_day(day);
        let filter = AppointmentFilter::for_doctor(doctor_id)
            .with_status(AppointmentStatus::Scheduled)
            .between(start, end);

        let booked: Vec<_> = self
            .store
            .list_appointments(&filter)
            .await?
            .into_iter()
            .map(|appointment| appointment.datetime)
            .collect();

        debug!("Doctor {} has {} booked slots on {}", doctor_id, booked.len(), day);
        Ok(booked)
    }
}
