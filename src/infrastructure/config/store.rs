//! Cache store configuration.

use serde::Deserialize;

use crate::adapter::outbound::sqlite::database::connection::ConnectionOptions;
use crate::adapter::outbound::sqlite::StoreOptions;
use crate::domain::ErrorCountPolicy;

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file. `DATABASE_PATH` overrides it.
    pub path: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
    pub connection_timeout_ms: u64,
    /// Seconds between maintenance sweeps.
    pub cleanup_interval_secs: u64,
    pub vacuum_probability: f64,
    pub error_count_policy: ErrorCountPolicy,
}

impl StoreConfig {
    #[must_use]
    pub fn to_options(&self) -> StoreOptions {
        StoreOptions {
            path: self.path.clone(),
            connection: ConnectionOptions {
                max_connections: self.max_connections,
                busy_timeout_ms: self.busy_timeout_ms,
                connection_timeout_ms: self.connection_timeout_ms,
            },
            error_count_policy: self.error_count_policy,
            vacuum_probability: self.vacuum_probability,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "routing-api.db".into(),
            max_connections: 5,
            busy_timeout_ms: 5000,
            connection_timeout_ms: 5000,
            cleanup_interval_secs: 3600,
            vacuum_probability: 0.01,
            error_count_policy: ErrorCountPolicy::default(),
        }
    }
}
