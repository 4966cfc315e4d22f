use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::appointment_routes;
use shared_database::AppState;
use shared_models::{Doctor, Patient};
use shared_utils::test_utils::{
    empty_request, json_request, memory_state, response_json, seed_doctor, seed_patient,
};

async fn seeded() -> (Arc<AppState>, Doctor, Patient) {
    let state = memory_state();
    let doctor = seed_doctor(state.store.as_ref(), "house@example.com").await;
    let patient = seed_patient(state.store.as_ref(), "ana@example.com", "555-0100").await;
    (state, doctor, patient)
}

async fn book(state: &Arc<AppState>, doctor: &Doctor, patient: &Patient, datetime: &str) -> (StatusCode, Value) {
    let response = appointment_routes(state.clone())
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "doctorId": doctor.id, "patientId": patient.id, "datetime": datetime }),
        ))
        .await
        .unwrap();
    let status = response.status();
    (status, response_json(response).await)
}

#[tokio::test]
async fn test_create_appointment_attaches_parties() {
    let (state, doctor, patient) = seeded().await;

    let (status, body) = book(&state, &doctor, &patient, "2024-11-18T09:00:00Z").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "SCHEDULED");
    assert_eq!(body["datetime"], "2024-11-18T09:00:00Z");
    assert_eq!(body["doctor"]["email"], "house@example.com");
    assert_eq!(body["patient"]["phone"], "555-0100");
}

#[tokio::test]
async fn test_forward_window_rejects_overlapping_start_and_admits_half_hour_after() {
    let (state, doctor, patient) = seeded().await;
    book(&state, &doctor, &patient, "2024-11-18T09:00:00Z").await;

    let (status, body) = book(&state, &doctor, &patient, "2024-11-18T09:00:00Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Doctor is not available at this time");

    let (status, _) = book(&state, &doctor, &patient, "2024-11-18T08:30:00Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = book(&state, &doctor, &patient, "2024-11-18T09:30:00Z").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = book(&state, &doctor, &patient, "2024-11-18T10:00:00Z").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_appointment_validation() {
    let (state, doctor, patient) = seeded().await;

    let response = appointment_routes(state.clone())
        .oneshot(json_request("POST", "/", json!({ "doctorId": doctor.id })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["missing"], json!(["patientId", "datetime"]));

    let (status, _) = book(&state, &doctor, &patient, "18/11/2024 09:00").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_appointment_unknown_patient() {
    let (state, doctor, _) = seeded().await;

    let response = appointment_routes(state)
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "doctorId": doctor.id, "patientId": Uuid::new_v4(), "datetime": "2024-11-18T09:00:00Z" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_json(response).await["error"], "Patient not found");
}

#[tokio::test]
async fn test_cancel_twice_returns_same_record() {
    let (state, doctor, patient) = seeded().await;
    let (_, created) = book(&state, &doctor, &patient, "2024-11-18T09:00:00Z").await;
    let uri = format!("/{}/cancel", created["id"].as_str().unwrap());

    let first = appointment_routes(state.clone())
        .oneshot(empty_request("PUT", &uri))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first = response_json(first).await;
    assert_eq!(first["status"], "CANCELLED");

    let second = appointment_routes(state.clone())
        .oneshot(empty_request("PUT", &uri))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(response_json(second).await, first);

    // The freed slot can be booked again.
    let (status, _) = book(&state, &doctor, &patient, "2024-11-18T09:00:00Z").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_reschedule_into_conflict_is_rejected() {
    let (state, doctor, patient) = seeded().await;
    book(&state, &doctor, &patient, "2024-11-18T09:00:00Z").await;
    let (_, movable) = book(&state, &doctor, &patient, "2024-11-18T14:00:00Z").await;
    let uri = format!("/{}/reschedule", movable["id"].as_str().unwrap());

    let rejected = appointment_routes(state.clone())
        .oneshot(json_request("PUT", &uri, json!({ "datetime": "2024-11-18T08:30:00Z" })))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let moved = appointment_routes(state.clone())
        .oneshot(json_request("PUT", &uri, json!({ "datetime": "2024-11-18T11:00:00Z" })))
        .await
        .unwrap();
    assert_eq!(moved.status(), StatusCode::OK);
    let moved = response_json(moved).await;
    assert_eq!(moved["id"], movable["id"]);
    assert_eq!(moved["datetime"], "2024-11-18T11:00:00Z");
}

#[tokio::test]
async fn test_reschedule_without_datetime_names_the_missing_field() {
    let (state, doctor, patient) = seeded().await;
    let (_, created) = book(&state, &doctor, &patient, "2024-11-18T09:00:00Z").await;

    let response = appointment_routes(state)
        .oneshot(json_request(
            "PUT",
            &format!("/{}/reschedule", created["id"].as_str().unwrap()),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Datetime is required");
    assert_eq!(body["missing"], json!(["datetime"]));
}

#[tokio::test]
async fn test_reschedule_cancelled_appointment_is_rejected() {
    let (state, doctor, patient) = seeded().await;
    let (_, created) = book(&state, &doctor, &patient, "2024-11-18T09:00:00Z").await;
    let id = created["id"].as_str().unwrap();

    appointment_routes(state.clone())
        .oneshot(empty_request("PUT", &format!("/{}/cancel", id)))
        .await
        .unwrap();

    let response = appointment_routes(state)
        .oneshot(json_request(
            "PUT",
            &format!("/{}/reschedule", id),
            json!({ "datetime": "2024-11-18T12:00:00Z" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response_json(response).await["error"],
        "Cannot move appointment from CANCELLED to SCHEDULED"
    );
}

#[tokio::test]
async fn test_list_by_date_is_ascending() {
    let (state, doctor, patient) = seeded().await;
    for datetime in ["2024-11-18T15:00:00Z", "2024-11-19T09:00:00Z", "2024-11-18T08:00:00Z"] {
        book(&state, &doctor, &patient, datetime).await;
    }

    let response = appointment_routes(state.clone())
        .oneshot(empty_request("GET", "/?date=2024-11-18"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["date"], "2024-11-18");
    assert_eq!(body["total"], 2);
    assert_eq!(body["appointments"][0]["datetime"], "2024-11-18T08:00:00Z");
    assert_eq!(body["appointments"][1]["datetime"], "2024-11-18T15:00:00Z");

    let all = appointment_routes(state)
        .oneshot(empty_request("GET", "/"))
        .await
        .unwrap();
    assert_eq!(response_json(all).await.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_by_date_requires_a_valid_date() {
    let response = appointment_routes(memory_state())
        .oneshot(empty_request("GET", "/by-date"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "Valid date is required");
}

#[tokio::test]
async fn test_get_and_delete_appointment() {
    let (state, doctor, patient) = seeded().await;
    let (_, created) = book(&state, &doctor, &patient, "2024-11-18T09:00:00Z").await;
    let uri = format!("/{}", created["id"].as_str().unwrap());

    let found = appointment_routes(state.clone()).oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(found.status(), StatusCode::OK);

    let deleted = appointment_routes(state.clone()).oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = appointment_routes(state.clone()).oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let again = appointment_routes(state).oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_appointment_id_is_bad_request() {
    let response = appointment_routes(memory_state())
        .oneshot(empty_request("GET", "/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
