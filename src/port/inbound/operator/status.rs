//! Status projections for operator-facing adapters.

use async_trait::async_trait;

use crate::domain::{ChainId, ProviderHealthRecord};
use crate::error::Result;

/// One row of the `chains` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStatus {
    pub chain_id: ChainId,
    pub name: &'static str,
    /// True when an RPC endpoint was configured and the graph was built.
    pub loaded: bool,
    pub provider_name: Option<String>,
    pub v2_supported: bool,
    pub v4_supported: bool,
    pub mixed_supported: bool,
}

/// Snapshot of one container build.
#[derive(Debug, Clone)]
pub struct ChainsSnapshot {
    pub activity_id: String,
    pub chains: Vec<ChainStatus>,
}

#[async_trait]
pub trait StatusOperator: Send + Sync {
    /// Build the container and describe every supported chain.
    async fn chains(&self, config_toml: &str) -> Result<ChainsSnapshot>;

    /// Stored health of one provider on one chain.
    async fn provider_health(
        &self,
        config_toml: &str,
        provider_name: &str,
        chain_id: ChainId,
    ) -> Result<Option<ProviderHealthRecord>>;
}
