use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_config::ConflictPolicy;
use shared_models::Appointment;

/// Every appointment occupies one hour from its start instant.
pub const APPOINTMENT_LENGTH_MINUTES: i64 = 60;

fn appointment_length() -> Duration {
    Duration::minutes(APPOINTMENT_LENGTH_MINUTES)
}

/// Decides whether a doctor can take a new appointment, given a snapshot of existing ones.
///
/// Only SCHEDULED appointments of the same doctor count. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetectionService {
    policy: ConflictPolicy,
}

impl ConflictDetectionService {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    pub fn is_available(
        &self,
        doctor_id: Uuid,
        requested: DateTime<Utc>,
        existing: &[Appointment],
    ) -> bool {
        self.conflicting_appointment(doctor_id, requested, existing).is_none()
    }

    /// First existing appointment that blocks `requested`, if any.
    pub fn conflicting_appointment<'a>(
        &self,
        doctor_id: Uuid,
        requested: DateTime<Utc>,
        existing: &'a [Appointment],
    ) -> Option<&'a Appointment> {
        let conflict = existing
            .iter()
            .filter(|appointment| appointment.doctor_id == doctor_id && appointment.is_scheduled())
            .find(|appointment| self.blocks(appointment.datetime, requested));

        if let Some(appointment) = conflict {
            debug!(
                "Requested {} for doctor {} collides with appointment {} at {} ({} policy)",
                requested, doctor_id, appointment.id, appointment.datetime, self.policy
            );
        }

        conflict
    }

    fn blocks(&self, existing: DateTime<Utc>, requested: DateTime<Utc>) -> bool {
        let window_end = requested + appointment_length();
        match self.policy {
            // Only looks forward: an appointment that started before `requested` never blocks it.
            ConflictPolicy::ForwardWindow => existing >= requested && existing < window_end,
            ConflictPolicy::Overlap => existing < window_end && requested < existing + appointment_length(),
        }
    }
}

/// Availability under the default forward-window rule.
pub fn is_available(doctor_id: Uuid, requested: DateTime<Utc>, existing: &[Appointment]) -> bool {
    ConflictDetectionService::default().is_available(doctor_id, requested, existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared_models::AppointmentStatus;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 18, hour, minute, 0).unwrap()
    }

    fn appointment(doctor_id: Uuid, datetime: DateTime<Utc>, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            doctor_id,
            patient_id: Uuid::new_v4(),
            datetime,
            status,
            created_at: datetime,
            updated_at: datetime,
        }
    }

    #[test]
    fn empty_snapshot_is_available() {
        assert!(is_available(Uuid::new_v4(), at(9, 0), &[]));
    }

    #[test]
    fn forward_window_boundaries() {
        let doctor = Uuid::new_v4();
        let existing = vec![appointment(doctor, at(9, 0), AppointmentStatus::Scheduled)];

        assert!(!is_available(doctor, at(9, 0), &existing));
        assert!(!is_available(doctor, at(8, 30), &existing));
        assert!(is_available(doctor, at(8, 0), &existing));
        assert!(is_available(doctor, at(9, 30), &existing));
        assert!(is_available(doctor, at(10, 0), &existing));
    }

    #[test]
    fn other_doctors_and_inactive_appointments_never_conflict() {
        let doctor = Uuid::new_v4();
        let existing = vec![
            appointment(Uuid::new_v4(), at(9, 0), AppointmentStatus::Scheduled),
            appointment(doctor, at(9, 0), AppointmentStatus::Cancelled),
            appointment(doctor, at(9, 0), AppointmentStatus::Completed),
        ];

        assert!(is_available(doctor, at(9, 0), &existing));
    }

    #[test]
    fn overlap_policy_also_looks_backwards() {
        let doctor = Uuid::new_v4();
        let existing = vec![appointment(doctor, at(9, 0), AppointmentStatus::Scheduled)];
        let overlap = ConflictDetectionService::new(ConflictPolicy::Overlap);

        assert!(!overlap.is_available(doctor, at(9, 30), &existing));
        assert!(!overlap.is_available(doctor, at(8, 30), &existing));
        assert!(overlap.is_available(doctor, at(10, 0), &existing));
        assert!(overlap.is_available(doctor, at(8, 0), &existing));
    }

    #[test]
    fn reports_the_blocking_appointment() {
        let doctor = Uuid::new_v4();
        let blocking = appointment(doctor, at(9, 15), AppointmentStatus::Scheduled);
        let existing = vec![
            appointment(doctor, at(11, 0), AppointmentStatus::Scheduled),
            blocking.clone(),
        ];

        let detector = ConflictDetectionService::default();
        assert_eq!(detector.conflicting_appointment(doctor, at(9, 0), &existing), Some(&blocking));
        assert_eq!(detector.conflicting_appointment(doctor, at(12, 0), &existing), None);
    }
}
