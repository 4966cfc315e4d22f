// =====================================================================================
// MONITORING CELL MODELS
// =====================================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    /// Store round trip in milliseconds, two decimal places.
    pub db_response_time_ms: f64,
    pub storage: String,
    pub memory: MemoryStats,
    /// Load averages over 1, 5 and 15 minutes. Zero where the OS has none.
    pub cpu: [f64; 3],
}

/// Host memory in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub free: u64,
    pub total: u64,
    pub used: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitoringError {
    #[error("Component health check failed: {0}")]
    HealthCheckFailed(String),
}
