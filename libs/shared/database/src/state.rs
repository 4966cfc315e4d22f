use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use shared_config::AppConfig;

use crate::locks::SchedulingLocks;
use crate::memory::MemoryStore;
use crate::store::ClinicStore;
use crate::supabase_store::SupabaseStore;

/// Process-wide state handed to every router.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ClinicStore>,
    pub scheduling_locks: SchedulingLocks,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ClinicStore>) -> Self {
        Self {
            config,
            store,
            scheduling_locks: SchedulingLocks::new(),
            started_at: Instant::now(),
        }
    }

    /// Picks the Supabase backend when it is configured, the in-memory store otherwise.
    pub fn from_config(config: AppConfig) -> Self {
        let store: Arc<dyn ClinicStore> = if config.is_configured() {
            info!("Using Supabase store at {}", config.supabase_url);
            Arc::new(SupabaseStore::new(&config))
        } else {
            warn!("Using in-memory store - data will not survive a restart");
            Arc::new(MemoryStore::new())
        };

        Self::new(config, store)
    }
}
