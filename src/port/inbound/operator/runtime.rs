//! Runtime control for operator-facing adapters.

use async_trait::async_trait;

use crate::error::Result;

/// Options for `serve`.
#[derive(Debug, Clone)]
pub struct ServeRequest {
    /// Raw TOML configuration content.
    pub config_toml: String,

    /// Override for the log level.
    pub log_level: Option<String>,

    /// Force JSON log output.
    pub json_logs: bool,

    /// Override for the database file path.
    pub database_path: Option<String>,
}

/// Runtime control use-cases.
#[async_trait]
pub trait RuntimeOperator: Send + Sync {
    /// Open the store, build the container, and run maintenance until the
    /// process is interrupted.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the store cannot be
    /// opened, or the container build fails fatally.
    async fn serve(&self, request: ServeRequest) -> Result<()>;
}
