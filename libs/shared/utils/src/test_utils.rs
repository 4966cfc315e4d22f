//! Fixtures shared by the cell test suites.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::Request,
    response::Response,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use shared_config::{AppConfig, ConflictPolicy};
use shared_database::{AppState, ClinicStore, MemoryStore};
use shared_models::{Doctor, NewDoctor, NewPatient, Patient};

pub struct TestConfig {
    pub conflict_policy: ConflictPolicy,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::ForwardWindow,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            conflict_policy: self.conflict_policy,
            ..AppConfig::default()
        }
    }

    /// Application state backed by a fresh in-memory store.
    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config(), Arc::new(MemoryStore::new())))
    }
}

pub fn memory_state() -> Arc<AppState> {
    TestConfig::default().to_state()
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid test timestamp")
}

pub async fn seed_doctor(store: &dyn ClinicStore, email: &str) -> Doctor {
    store
        .create_doctor(NewDoctor {
            first_name: "Gregory".to_string(),
            last_name: "House".to_string(),
            email: email.to_string(),
        })
        .await
        .expect("seed doctor")
}

pub async fn seed_patient(store: &dyn ClinicStore, email: &str, phone: &str) -> Patient {
    store
        .create_patient(NewPatient {
            first_name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 2).expect("valid birth date"),
        })
        .await
        .expect("seed patient")
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub async fn response_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("readable body");
    serde_json::from_slice(&body).expect("json body")
}
