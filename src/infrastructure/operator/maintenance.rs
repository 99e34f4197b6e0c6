//! Maintenance operator implementation.

use async_trait::async_trait;
use tracing::info;

use crate::domain::CleanupReport;
use crate::error::Result;
use crate::port::inbound::operator::maintenance::MaintenanceOperator;

use super::{entry::Operator, shared};

#[async_trait]
impl MaintenanceOperator for Operator {
    async fn sweep(&self, config_toml: &str) -> Result<CleanupReport> {
        let config = shared::load_config(config_toml)?;
        let store = shared::open_store(&config)?;
        let report = store.cleanup().await;
        store.close();

        let report = report?;
        info!(
            path = %config.store.path,
            removed = report.total_removed(),
            vacuumed = report.vacuumed,
            "Sweep complete"
        );
        Ok(report)
    }
}
