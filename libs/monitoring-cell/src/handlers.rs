// =====================================================================================
// MONITORING CELL HANDLERS
// =====================================================================================

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use shared_database::AppState;

use crate::models::{HealthReport, HealthStatus, MonitoringError};
use crate::services::HealthMonitorService;

#[axum::debug_handler]
pub async fn get_health_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthReport>, MonitoringError> {
    let health_service = HealthMonitorService::new(&state);
    let report = health_service.check_health().await?;
    Ok(Json(report))
}

impl IntoResponse for MonitoringError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            MonitoringError::HealthCheckFailed(reason) => (StatusCode::SERVICE_UNAVAILABLE, reason.clone()),
        };

        (status, Json(serde_json::json!({
            "status": HealthStatus::Unhealthy,
            "error": message,
            "timestamp": chrono::Utc::now()
        }))).into_response()
    }
}
