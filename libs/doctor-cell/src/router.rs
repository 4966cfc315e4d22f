use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors).post(handlers::create_doctor))
        .route("/available-slots", get(handlers::get_available_slots))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/schedule", get(handlers::get_doctor_schedule))
        .with_state(state)
}
