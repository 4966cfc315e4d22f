// =====================================================================================
// MONITORING CELL ROUTER
// =====================================================================================

use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers::get_health_status;

pub fn create_monitoring_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(get_health_status))
        .with_state(state)
}
