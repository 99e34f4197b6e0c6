//! Subgraph providers backed by a fixed set of seed pools.

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::domain::{ChainId, Protocol, SubgraphPool};
use crate::error::Result;
use crate::port::SubgraphProvider;

/// Serves the seed pools of one chain and protocol, highest TVL first.
pub struct StaticSubgraphProvider {
    protocol: Protocol,
    pools: Vec<SubgraphPool>,
}

impl StaticSubgraphProvider {
    /// Keep the seeds that belong to `chain_id` and `protocol`.
    pub fn new(chain_id: ChainId, protocol: Protocol, seeds: &[SubgraphPool]) -> Self {
        let mut pools: Vec<SubgraphPool> = seeds
            .iter()
            .filter(|p| p.chain_id == chain_id && p.protocol == protocol)
            .cloned()
            .collect();
        pools.sort_by(|a, b| b.tvl_usd.total_cmp(&a.tvl_usd));
        Self { protocol, pools }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

#[async_trait]
impl SubgraphProvider for StaticSubgraphProvider {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Pools touching either token; every pool when neither is given.
    async fn get_pools(
        &self,
        token_in: Option<Address>,
        token_out: Option<Address>,
    ) -> Result<Vec<SubgraphPool>> {
        if token_in.is_none() && token_out.is_none() {
            return Ok(self.pools.clone());
        }
        Ok(self
            .pools
            .iter()
            .filter(|pool| {
                token_in.is_some_and(|t| pool.touches(&t))
                    || token_out.is_some_and(|t| pool.touches(&t))
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(chain_id: ChainId, protocol: Protocol, a: u8, b: u8, tvl_usd: f64) -> SubgraphPool {
        SubgraphPool {
            chain_id,
            protocol,
            id: format!("{a}-{b}"),
            token0: Address::repeat_byte(a),
            token1: Address::repeat_byte(b),
            fee_tier: Some(3000),
            tvl_usd,
        }
    }

    #[tokio::test]
    async fn serves_only_matching_chain_and_protocol() {
        let seeds = [
            seed(ChainId::MAINNET, Protocol::V3, 1, 2, 10.0),
            seed(ChainId::MAINNET, Protocol::V2, 1, 2, 10.0),
            seed(ChainId::BASE, Protocol::V3, 1, 2, 10.0),
            seed(ChainId::MAINNET, Protocol::V3, 3, 4, 50.0),
        ];
        let provider = StaticSubgraphProvider::new(ChainId::MAINNET, Protocol::V3, &seeds);
        assert_eq!(provider.len(), 2);

        let all = provider.get_pools(None, None).await.unwrap();
        assert_eq!(all[0].id, "3-4");

        let touching = provider
            .get_pools(Some(Address::repeat_byte(2)), None)
            .await
            .unwrap();
        assert_eq!(touching.len(), 1);
        assert_eq!(touching[0].id, "1-2");
    }
}
