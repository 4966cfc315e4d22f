use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, Doctor, NewAppointment,
    NewDoctor, NewPatient, Patient,
};

use crate::store::{ClinicStore, StoreError};
use crate::supabase::SupabaseClient;

#[derive(Debug, Deserialize)]
struct PatientRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    date_of_birth: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Patient {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            date_of_birth: row.date_of_birth,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DoctorRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DoctorRow> for Doctor {
    fn from(row: DoctorRow) -> Self {
        Doctor {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AppointmentRow {
    id: Uuid,
    doctor_id: Uuid,
    patient_id: Uuid,
    datetime: DateTime<Utc>,
    status: AppointmentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Appointment {
            id: row.id,
            doctor_id: row.doctor_id,
            patient_id: row.patient_id,
            datetime: row.datetime,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `ClinicStore` over the Supabase REST API (tables `patients`, `doctors`, `appointments`).
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn select<R>(&self, path: &str) -> Result<Vec<R>, StoreError>
    where
        R: for<'de> Deserialize<'de>,
    {
        self.supabase.request(Method::GET, path, None).await
    }

    async fn insert<R>(&self, table: &str, row: Value) -> Result<R, StoreError>
    where
        R: for<'de> Deserialize<'de>,
    {
        let path = format!("/rest/v1/{}", table);
        let result: Vec<R> = self
            .supabase
            .request_with_headers(
                Method::POST,
                &path,
                Some(row),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend(format!("Insert into {} returned no rows", table)))
    }

    fn appointment_query(filter: &AppointmentFilter) -> String {
        let mut query_parts = Vec::new();

        if let Some(doctor_id) = filter.doctor_id {
            query_parts.push(format!("doctor_id=eq.{}", doctor_id));
        }
        if let Some(patient_id) = filter.patient_id {
            query_parts.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(status) = filter.status {
            query_parts.push(format!("status=eq.{}", status));
        }
        if let Some(from) = filter.from {
            query_parts.push(format!("datetime=gte.{}", urlencoding::encode(&timestamp(from))));
        }
        if let Some(until) = filter.until {
            query_parts.push(format!("datetime=lt.{}", urlencoding::encode(&timestamp(until))));
        }
        query_parts.push("order=datetime.asc".to_string());

        format!("/rest/v1/appointments?{}", query_parts.join("&"))
    }
}

#[async_trait]
impl ClinicStore for SupabaseStore {
    fn backend_name(&self) -> &'static str {
        "supabase"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let _: Vec<Value> = self.select("/rest/v1/doctors?select=id&limit=1").await?;
        Ok(())
    }

    async fn create_patient(&self, patient: NewPatient) -> Result<Patient, StoreError> {
        let now = timestamp(Utc::now());
        let row: PatientRow = self
            .insert(
                "patients",
                json!({
                    "first_name": patient.first_name,
                    "last_name": patient.last_name,
                    "email": patient.email,
                    "phone": patient.phone,
                    "date_of_birth": patient.date_of_birth.format("%Y-%m-%d").to_string(),
                    "created_at": now,
                    "updated_at": now,
                }),
            )
            .await?;

        Ok(row.into())
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, StoreError> {
        let rows: Vec<PatientRow> = self.select("/rest/v1/patients?order=created_at.asc").await?;
        Ok(rows.into_iter().map(Patient::from).collect())
    }

    async fn find_patient(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        let path = format!("/rest/v1/patients?id=eq.{}&limit=1", id);
        let rows: Vec<PatientRow> = self.select(&path).await?;
        Ok(rows.into_iter().next().map(Patient::from))
    }

    async fn find_patient_by_phone(&self, phone: &str) -> Result<Option<Patient>, StoreError> {
        let path = format!("/rest/v1/patients?phone=eq.{}&limit=1", urlencoding::encode(phone));
        let rows: Vec<PatientRow> = self.select(&path).await?;
        Ok(rows.into_iter().next().map(Patient::from))
    }

    async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let now = timestamp(Utc::now());
        let row: DoctorRow = self
            .insert(
                "doctors",
                json!({
                    "first_name": doctor.first_name,
                    "last_name": doctor.last_name,
                    "email": doctor.email,
                    "created_at": now,
                    "updated_at": now,
                }),
            )
            .await?;

        Ok(row.into())
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        let rows: Vec<DoctorRow> = self.select("/rest/v1/doctors?order=created_at.asc").await?;
        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    async fn find_doctor(&self, id: Uuid) -> Result<Option<Doctor>, StoreError> {
        let path = format!("/rest/v1/doctors?id=eq.{}&limit=1", id);
        let rows: Vec<DoctorRow> = self.select(&path).await?;
        Ok(rows.into_iter().next().map(Doctor::from))
    }

    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        let now = timestamp(Utc::now());
        let row: AppointmentRow = self
            .insert(
                "appointments",
                json!({
                    "doctor_id": appointment.doctor_id,
                    "patient_id": appointment.patient_id,
                    "datetime": timestamp(appointment.datetime),
                    "status": AppointmentStatus::Scheduled,
                    "created_at": now,
                    "updated_at": now,
                }),
            )
            .await?;

        Ok(row.into())
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let path = format!("/rest/v1/appointments?id=eq.{}&limit=1", id);
        let rows: Vec<AppointmentRow> = self.select(&path).await?;
        Ok(rows.into_iter().next().map(Appointment::from))
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, StoreError> {
        let rows: Vec<AppointmentRow> = self.select(&Self::appointment_query(filter)).await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> Result<Appointment, StoreError> {
        let mut update_data = Map::new();

        if let Some(datetime) = changes.datetime {
            update_data.insert("datetime".to_string(), json!(timestamp(datetime)));
        }
        if let Some(status) = changes.status {
            update_data.insert("status".to_string(), json!(status));
        }
        update_data.insert("updated_at".to_string(), json!(timestamp(Utc::now())));

        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let rows: Vec<AppointmentRow> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(Value::Object(update_data)),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        rows.into_iter()
            .next()
            .map(Appointment::from)
            .ok_or(StoreError::NotFound { entity: "Appointment" })
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<(), StoreError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let rows: Vec<AppointmentRow> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                None,
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound { entity: "Appointment" });
        }
        Ok(())
    }
}
