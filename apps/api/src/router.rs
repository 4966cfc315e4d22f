use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use monitoring_cell::router::create_monitoring_router;
use patient_cell::router::create_patient_router;
use shared_database::AppState;
use shared_utils::middleware::request_tracking_middleware;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Care Plus scheduling API is running!" }))
        .nest("/api/health", create_monitoring_router(state.clone()))
        .nest("/api/appointments", appointment_routes(state.clone()))
        .nest("/api/doctors", doctor_routes(state.clone()))
        .nest("/api/patients", create_patient_router(state))
}

/// The routes wrapped in the layers every response goes through.
pub fn create_app(state: Arc<AppState>) -> Router {
    create_router(state)
        .layer(middleware::from_fn(request_tracking_middleware))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(CorsLayer::permissive())
}
