use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_PORT: u16 = 3001;

/// How a requested appointment is compared against a doctor's existing bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Reject when an existing booking starts inside `[requested, requested + 1h)`.
    #[default]
    ForwardWindow,
    /// Reject when the one-hour windows of the two bookings intersect at all.
    Overlap,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "forward-window" | "forward_window" | "forward" => Ok(ConflictPolicy::ForwardWindow),
            "overlap" => Ok(ConflictPolicy::Overlap),
            other => Err(format!("unknown conflict policy: {}", other)),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictPolicy::ForwardWindow => write!(f, "forward-window"),
            ConflictPolicy::Overlap => write!(f, "overlap"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub conflict_policy: ConflictPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("PORT is not a valid port number ({}), using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let supabase_url = env::var("SUPABASE_URL")
            .unwrap_or_else(|_| {
                warn!("SUPABASE_URL not set, using empty value");
                String::new()
            });

        // The service role key bypasses row level security; the anon key is accepted for local setups.
        let supabase_service_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .or_else(|_| env::var("SUPABASE_ANON_PUBLIC_KEY"))
            .unwrap_or_else(|_| {
                warn!("SUPABASE_SERVICE_ROLE_KEY not set, using empty value");
                String::new()
            });

        let conflict_policy = match env::var("CONFLICT_POLICY") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, using {}", e, ConflictPolicy::default());
                ConflictPolicy::default()
            }),
            Err(_) => ConflictPolicy::default(),
        };

        let config = Self {
            port,
            supabase_url,
            supabase_service_key,
            conflict_policy,
        };

        if !config.is_configured() {
            warn!("Supabase not configured - falling back to the in-memory store");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }
}
