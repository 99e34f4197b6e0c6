//! Pool state snapshots for each protocol version.

use std::hash::Hash;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use super::{ChainId, Protocol};

/// A pool snapshot that can be looked up by a stable key.
pub trait PoolKeyed: Clone + Send + Sync + 'static {
    /// Identifier the pool is fetched and cached under.
    type Key: Clone + Eq + Hash + Send + Sync + 'static;

    fn pool_key(&self) -> Self::Key;
}

/// Constant-product pair state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V2Pair {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub reserve0: U256,
    pub reserve1: U256,
    pub block_number: Option<u64>,
}

impl PoolKeyed for V2Pair {
    type Key = Address;

    fn pool_key(&self) -> Address {
        self.address
    }
}

/// Concentrated-liquidity pool state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V3Pool {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    /// Fee tier in hundredths of a bip.
    pub fee: u32,
    pub liquidity: u128,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub block_number: Option<u64>,
}

impl PoolKeyed for V3Pool {
    type Key = Address;

    fn pool_key(&self) -> Address {
        self.address
    }
}

/// Singleton-pool state, keyed by pool id rather than address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V4Pool {
    pub pool_id: B256,
    pub liquidity: u128,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub lp_fee: u32,
    pub block_number: Option<u64>,
}

impl PoolKeyed for V4Pool {
    type Key = B256;

    fn pool_key(&self) -> B256 {
        self.pool_id
    }
}

/// Candidate pool served by a subgraph provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphPool {
    pub chain_id: ChainId,
    pub protocol: Protocol,
    /// Pool address for v2/v3, pool id for v4.
    pub id: String,
    pub token0: Address,
    pub token1: Address,
    #[serde(default)]
    pub fee_tier: Option<u32>,
    #[serde(default)]
    pub tvl_usd: f64,
}

impl SubgraphPool {
    /// True when the pool trades `token`.
    #[must_use]
    pub fn touches(&self, token: &Address) -> bool {
        &self.token0 == token || &self.token1 == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn v3_pool_round_trips_through_json() {
        let pool = V3Pool {
            address: address!("88e6a0c2ddd26feeb64f039a2c41296fcb3f5640"),
            token0: address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
            token1: address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
            fee: 500,
            liquidity: 12_345,
            sqrt_price_x96: U256::from(1u64) << 96usize,
            tick: -200_000,
            block_number: Some(19_000_000),
        };
        let json = serde_json::to_string(&pool).unwrap();
        assert!(json.contains("sqrtPriceX96"));
        let decoded: V3Pool = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, pool);
        assert_eq!(decoded.pool_key(), pool.address);
    }

    #[test]
    fn subgraph_pool_touches_either_token() {
        let a = address!("0000000000000000000000000000000000000001");
        let b = address!("0000000000000000000000000000000000000002");
        let pool = SubgraphPool {
            chain_id: ChainId::MAINNET,
            protocol: Protocol::V2,
            id: "pair".into(),
            token0: a,
            token1: b,
            fee_tier: None,
            tvl_usd: 0.0,
        };
        assert!(pool.touches(&a));
        assert!(pool.touches(&b));
        assert!(!pool.touches(&Address::ZERO));
    }
}
