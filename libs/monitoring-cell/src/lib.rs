// =====================================================================================
// MONITORING CELL - SERVICE HEALTH
// =====================================================================================
//
// Liveness and storage reachability for load balancers and operators.
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{HealthReport, HealthStatus, MonitoringError};
pub use router::create_monitoring_router;
pub use services::HealthMonitorService;
