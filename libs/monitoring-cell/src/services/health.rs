// =====================================================================================
// HEALTH MONITORING SERVICE
// =====================================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use sysinfo::System;
use tracing::{debug, error, instrument};

use shared_database::{AppState, ClinicStore};

use crate::models::{HealthReport, HealthStatus, MemoryStats, MonitoringError};

pub struct HealthMonitorService {
    started_at: Instant,
    store: Arc<dyn ClinicStore>,
}

impl HealthMonitorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            started_at: state.started_at,
            store: state.store.clone(),
        }
    }

    /// Pings the store and reports how long the round trip took.
    #[instrument(skip(self))]
    pub async fn check_health(&self) -> Result<HealthReport, MonitoringError> {
        let start = Instant::now();

        if let Err(e) = self.store.ping().await {
            error!("Storage health check failed: {}", e);
            return Err(MonitoringError::HealthCheckFailed(e.to_string()));
        }

        let db_response_time = start.elapsed();
        debug!("Storage ping answered in {:?}", db_response_time);

        Ok(HealthReport {
            status: HealthStatus::Healthy,
            timestamp: chrono::Utc::now(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
            db_response_time_ms: as_millis(db_response_time),
            storage: self.store.backend_name().to_string(),
            memory: memory_stats(),
            cpu: load_average(),
        })
    }
}

fn as_millis(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100_000.0).round() / 100.0
}

fn memory_stats() -> MemoryStats {
    let mut sys = System::new();
    sys.refresh_memory();

    let total = sys.total_memory();
    let free = sys.free_memory();
    MemoryStats {
        free,
        total,
        used: total.saturating_sub(free),
    }
}

fn load_average() -> [f64; 3] {
    let load = System::load_average();
    [load.one, load.five, load.fifteen]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_time_keeps_two_decimals() {
        assert_eq!(as_millis(Duration::from_micros(1_234)), 1.23);
        assert_eq!(as_millis(Duration::from_micros(1_235_600)), 1235.6);
        assert_eq!(as_millis(Duration::from_nanos(400)), 0.0);
    }

    #[test]
    fn memory_used_is_total_minus_free() {
        let memory = memory_stats();
        assert!(memory.free <= memory.total);
        assert_eq!(memory.used, memory.total - memory.free);
    }
}
