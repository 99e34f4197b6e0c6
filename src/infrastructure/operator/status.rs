//! Status operator implementation.

use async_trait::async_trait;

use crate::domain::{ChainId, ProviderHealthRecord};
use crate::error::Result;
use crate::infrastructure::builder::ContainerBuilder;
use crate::port::inbound::operator::status::{ChainStatus, ChainsSnapshot, StatusOperator};
use crate::port::RpcEndpoint;

use super::{entry::Operator, shared};

#[async_trait]
impl StatusOperator for Operator {
    async fn chains(&self, config_toml: &str) -> Result<ChainsSnapshot> {
        let config = shared::load_config(config_toml)?;
        let container = ContainerBuilder::new(config).build().await?;

        let chains = container
            .graphs()
            .map(|graph| {
                let features = graph.features();
                ChainStatus {
                    chain_id: graph.chain_id(),
                    name: graph.chain_id().name(),
                    loaded: graph.is_loaded(),
                    provider_name: graph.rpc().map(|rpc| rpc.provider_name().to_string()),
                    v2_supported: features.v2_supported,
                    v4_supported: features.v4_supported,
                    mixed_supported: features.mixed_supported,
                }
            })
            .collect();

        Ok(ChainsSnapshot {
            activity_id: container.activity_id().to_string(),
            chains,
        })
    }

    async fn provider_health(
        &self,
        config_toml: &str,
        provider_name: &str,
        chain_id: ChainId,
    ) -> Result<Option<ProviderHealthRecord>> {
        let config = shared::load_config(config_toml)?;
        let store = shared::open_store(&config)?;
        let record = store.provider_health(provider_name, chain_id).await;
        store.close();
        Ok(record?)
    }
}
