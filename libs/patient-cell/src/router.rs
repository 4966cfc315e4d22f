use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers::*;

pub fn create_patient_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_patients).post(create_patient))
        .route("/search", get(search_patient_by_phone))
        .with_state(state)
}
