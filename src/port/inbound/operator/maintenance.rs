//! Store maintenance for operator-facing adapters.

use async_trait::async_trait;

use crate::domain::CleanupReport;
use crate::error::Result;

#[async_trait]
pub trait MaintenanceOperator: Send + Sync {
    /// Run one expiry sweep over the configured store.
    async fn sweep(&self, config_toml: &str) -> Result<CleanupReport>;
}
