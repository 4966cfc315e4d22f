use assert_matches::assert_matches;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_database::{ClinicStore, StoreError, SupabaseStore};
use shared_models::{AppointmentChanges, AppointmentFilter, AppointmentStatus, NewAppointment, NewPatient};

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: server.uri(),
        supabase_service_key: "test-service-key".to_string(),
        ..AppConfig::default()
    }
}

fn appointment_row(id: Uuid, doctor_id: Uuid, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "doctor_id": doctor_id,
        "patient_id": Uuid::new_v4(),
        "datetime": "2024-11-18T09:00:00.000Z",
        "status": status,
        "created_at": "2024-11-01T00:00:00Z",
        "updated_at": "2024-11-01T00:00:00Z"
    })
}

#[tokio::test]
async fn lists_doctor_appointments_with_range_filters() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(header("apikey", "test-service-key"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(query_param("status", "eq.SCHEDULED"))
        .and(query_param("datetime", "gte.2024-11-18T08:00:00.000Z"))
        .and(query_param("datetime", "lt.2024-11-18T17:00:00.000Z"))
        .and(query_param("order", "datetime.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(appointment_id, doctor_id, "SCHEDULED")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = SupabaseStore::new(&config_for(&server));
    let filter = AppointmentFilter::for_doctor(doctor_id)
        .with_status(AppointmentStatus::Scheduled)
        .between(
            Utc.with_ymd_and_hms(2024, 11, 18, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 11, 18, 17, 0, 0).unwrap(),
        );

    let appointments = store.list_appointments(&filter).await.unwrap();

    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].id, appointment_id);
    assert_eq!(appointments[0].status, AppointmentStatus::Scheduled);
}

#[tokio::test]
async fn creates_appointments_as_scheduled() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({
            "doctor_id": doctor_id,
            "datetime": "2024-11-18T09:00:00.000Z",
            "status": "SCHEDULED"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            appointment_row(Uuid::new_v4(), doctor_id, "SCHEDULED")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = SupabaseStore::new(&config_for(&server));
    let created = store
        .create_appointment(NewAppointment {
            doctor_id,
            patient_id: Uuid::new_v4(),
            datetime: Utc.with_ymd_and_hms(2024, 11, 18, 9, 0, 0).unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(created.doctor_id, doctor_id);
}

#[tokio::test]
async fn maps_unique_violations_to_duplicate_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "details": "Key (email)=(ana@example.com) already exists.",
            "message": "duplicate key value violates unique constraint \"patients_email_key\""
        })))
        .mount(&server)
        .await;

    let store = SupabaseStore::new(&config_for(&server));
    let result = store
        .create_patient(NewPatient {
            first_name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            email: "ana@example.com".to_string(),
            phone: "555-0100".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
        })
        .await;

    assert_matches!(result, Err(StoreError::Duplicate { field }) if field == "email");
}

#[tokio::test]
async fn update_of_unknown_appointment_is_not_found() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .and(body_partial_json(json!({ "status": "CANCELLED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = SupabaseStore::new(&config_for(&server));
    let result = store
        .update_appointment(id, AppointmentChanges::status(AppointmentStatus::Cancelled))
        .await;

    assert_matches!(result, Err(StoreError::NotFound { .. }));
}

#[tokio::test]
async fn server_errors_surface_as_backend_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let store = SupabaseStore::new(&config_for(&server));

    assert_matches!(store.ping().await, Err(StoreError::Backend(_)));
    assert_matches!(store.find_doctor(Uuid::new_v4()).await, Err(StoreError::Backend(_)));
}

#[tokio::test]
async fn trailing_slash_in_project_url_is_ignored() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("select", "id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = AppConfig {
        supabase_url: format!("{}/", server.uri()),
        ..config_for(&server)
    };
    SupabaseStore::new(&config).ping().await.unwrap();
}
