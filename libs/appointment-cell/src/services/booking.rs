// libs/appointment-cell/src/services/booking.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{AppState, ClinicStore, SchedulingLocks};
use shared_models::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, Doctor, Patient,
};

use crate::models::{
    AppointmentDetails, AppointmentError, CreateAppointmentRequest, RescheduleAppointmentRequest,
};
use crate::services::conflict::{ConflictDetectionService, APPOINTMENT_LENGTH_MINUTES};
use crate::services::lifecycle::AppointmentLifecycleService;

/// Creates, moves and cancels appointments.
///
/// Every check-then-write sequence for a doctor runs while holding that doctor's
/// scheduling lock, so two requests cannot both pass the availability check for
/// the same slot inside this process.
pub struct AppointmentBookingService<'a> {
    store: Arc<dyn ClinicStore>,
    locks: &'a SchedulingLocks,
    conflict_service: ConflictDetectionService,
    lifecycle_service: AppointmentLifecycleService,
}

impl<'a> AppointmentBookingService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: state.store.clone(),
            locks: &state.scheduling_locks,
            conflict_service: ConflictDetectionService::new(state.config.conflict_policy),
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentDetails, AppointmentError> {
        let new_appointment = request.validate()?;
        info!(
            "Booking appointment for patient {} with doctor {} at {}",
            new_appointment.patient_id, new_appointment.doctor_id, new_appointment.datetime
        );

        let doctor = self
            .store
            .find_doctor(new_appointment.doctor_id)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;
        let patient = self
            .store
            .find_patient(new_appointment.patient_id)
            .await?
            .ok_or(AppointmentError::PatientNotFound)?;

        let _guard = self.locks.acquire(doctor.id).await;

        self.ensure_available(doctor.id, new_appointment.datetime, None).await?;
        let appointment = self.store.create_appointment(new_appointment).await?;

        info!("Appointment {} booked successfully", appointment.id);
        Ok(AppointmentDetails {
            appointment,
            doctor: Some(doctor),
            patient: Some(patient),
        })
    }

    /// Moves a SCHEDULED appointment to a new start, keeping its id.
    pub async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        request: RescheduleAppointmentRequest,
    ) -> Result<AppointmentDetails, AppointmentError> {
        let new_datetime = request.validate()?;
        info!("Rescheduling appointment {} to {}", appointment_id, new_datetime);

        let doctor_id = self.find_appointment(appointment_id).await?.doctor_id;
        let _guard = self.locks.acquire(doctor_id).await;

        // Re-read under the lock; the status may have changed while waiting.
        let current = self.find_appointment(appointment_id).await?;
        self.lifecycle_service
            .validate_status_transition(current.status, AppointmentStatus::Scheduled)?;
        self.ensure_available(current.doctor_id, new_datetime, Some(current.id)).await?;

        let appointment = self
            .store
            .update_appointment(appointment_id, AppointmentChanges::reschedule(new_datetime))
            .await?;

        info!("Appointment {} moved to {}", appointment.id, appointment.datetime);
        self.attach_parties(appointment).await
    }

    /// Cancelling an already cancelled appointment returns it unchanged.
    pub async fn cancel_appointment(&self, appointment_id: Uuid) -> Result<AppointmentDetails, AppointmentError> {
        info!("Cancelling appointment {}", appointment_id);

        let doctor_id = self.find_appointment(appointment_id).await?.doctor_id;
        let _guard = self.locks.acquire(doctor_id).await;

        let current = self.find_appointment(appointment_id).await?;
        if current.status == AppointmentStatus::Cancelled {
            debug!("Appointment {} is already cancelled", appointment_id);
            return self.attach_parties(current).await;
        }

        self.lifecycle_service
            .validate_status_transition(current.status, AppointmentStatus::Cancelled)?;

        let appointment = self
            .store
            .update_appointment(appointment_id, AppointmentChanges::status(AppointmentStatus::Cancelled))
            .await?;

        info!("Appointment {} cancelled", appointment.id);
        self.attach_parties(appointment).await
    }

    /// Every appointment, any status, starting within the UTC calendar day.
    pub async fn list_by_date(&self, day: NaiveDate) -> Result<Vec<AppointmentDetails>, AppointmentError> {
        let start = day.and_time(NaiveTime::MIN).and_utc();
        let filter = AppointmentFilter::default().between(start, start + Duration::days(1));

        let appointments = self.store.list_appointments(&filter).await?;
        debug!("Found {} appointments on {}", appointments.len(), day);

        self.attach_all(appointments).await
    }

    pub async fn list_all(&self) -> Result<Vec<AppointmentDetails>, AppointmentError> {
        let appointments = self.store.list_appointments(&AppointmentFilter::default()).await?;
        self.attach_all(appointments).await
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<AppointmentDetails, AppointmentError> {
        let appointment = self.find_appointment(appointment_id).await?;
        self.attach_parties(appointment).await
    }

    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), AppointmentError> {
        self.store.delete_appointment(appointment_id).await?;
        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    async fn find_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.store
            .find_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    async fn ensure_available(
        &self,
        doctor_id: Uuid,
        requested: DateTime<Utc>,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<(), AppointmentError> {
        // Wide enough for either policy to see every appointment that could block `requested`.
        let reach = Duration::minutes(APPOINTMENT_LENGTH_MINUTES);
        let filter = AppointmentFilter::for_doctor(doctor_id)
            .with_status(AppointmentStatus::Scheduled)
            .between(requested - reach, requested + reach);

        let existing: Vec<Appointment> = self
            .store
            .list_appointments(&filter)
            .await?
            .into_iter()
            .filter(|appointment| Some(appointment.id) != exclude_appointment_id)
            .collect();

        if let Some(conflict) = self
            .conflict_service
            .conflicting_appointment(doctor_id, requested, &existing)
        {
            warn!(
                "Doctor {} is not available at {}: appointment {} starts at {}",
                doctor_id, requested, conflict.id, conflict.datetime
            );
            return Err(AppointmentError::DoctorNotAvailable);
        }

        Ok(())
    }

    async fn attach_parties(&self, appointment: Appointment) -> Result<AppointmentDetails, AppointmentError> {
        let doctor = self.store.find_doctor(appointment.doctor_id).await?;
        let patient = self.store.find_patient(appointment.patient_id).await?;
        Ok(AppointmentDetails { appointment, doctor, patient })
    }

    async fn attach_all(&self, appointments: Vec<Appointment>) -> Result<Vec<AppointmentDetails>, AppointmentError> {
        if appointments.is_empty() {
            return Ok(Vec::new());
        }

        let doctors: HashMap<Uuid, Doctor> = self
            .store
            .list_doctors()
            .await?
            .into_iter()
            .map(|doctor| (doctor.id, doctor))
            .collect();
        let patients: HashMap<Uuid, Patient> = self
            .store
            .list_patients()
            .await?
            .into_iter()
            .map(|patient| (patient.id, patient))
            .collect();

        Ok(appointments
            .into_iter()
            .map(|appointment| AppointmentDetails {
                doctor: doctors.get(&appointment.doctor_id).cloned(),
                patient: patients.get(&appointment.patient_id).cloned(),
                appointment,
            })
            .collect())
    }
}
