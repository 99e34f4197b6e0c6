//! Seed pools served by the static subgraph providers.

use alloy_primitives::Address;
use serde::Deserialize;

use crate::domain::{ChainId, Protocol, SubgraphPool};

/// `[subgraph]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubgraphConfig {
    pub seed_pools: Vec<SeedPoolConfig>,
}

/// One `[[subgraph.seed_pools]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPoolConfig {
    pub chain_id: u64,
    pub protocol: Protocol,
    pub id: String,
    pub token0: Address,
    pub token1: Address,
    #[serde(default)]
    pub fee_tier: Option<u32>,
    #[serde(default)]
    pub tvl_usd: f64,
}

impl SubgraphConfig {
    #[must_use]
    pub fn seeds(&self) -> Vec<SubgraphPool> {
        self.seed_pools
            .iter()
            .map(|seed| SubgraphPool {
                chain_id: ChainId::new(seed.chain_id),
                protocol: seed.protocol,
                id: seed.id.clone(),
                token0: seed.token0,
                token1: seed.token1,
                fee_tier: seed.fee_tier,
                tvl_usd: seed.tvl_usd,
            })
            .collect()
    }
}
