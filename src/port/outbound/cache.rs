//! Cache ports consumed by the external routing engine.
//!
//! Implementations never fail: reads report a miss on any store error and
//! writes are best-effort.

use async_trait::async_trait;
use alloy_primitives::Address;

use crate::domain::{ChainId, Protocol, TokenProperties, TradeType, V2Pair, V3Pool};

/// Everything that distinguishes one cached route computation from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCacheKey {
    pub chain_id: ChainId,
    pub amount: String,
    /// Token whose amount is quoted, passed through verbatim.
    pub quote_token: String,
    pub trade_type: TradeType,
    pub protocols: Vec<Protocol>,
    /// `None` means the latest block.
    pub block_number: Option<u64>,
    pub optimistic: bool,
}

#[async_trait]
pub trait RouteCachingProvider: Send + Sync {
    async fn get_cached_route(&self, key: &RouteCacheKey) -> Option<serde_json::Value>;

    async fn set_cached_route(&self, key: &RouteCacheKey, route: &serde_json::Value);

    async fn get_cached_routes(&self, key: &RouteCacheKey) -> Option<Vec<serde_json::Value>>;

    async fn set_cached_routes(&self, key: &RouteCacheKey, routes: &[serde_json::Value]);
}

#[async_trait]
pub trait PoolCacheProvider: Send + Sync {
    async fn get_pool(&self, chain_id: ChainId, address: &Address) -> Option<V3Pool>;

    async fn set_pool(&self, chain_id: ChainId, pool: &V3Pool);
}

#[async_trait]
pub trait PairCacheProvider: Send + Sync {
    async fn get_pair(&self, chain_id: ChainId, address: &Address) -> Option<V2Pair>;

    async fn set_pair(&self, chain_id: ChainId, pair: &V2Pair);
}

#[async_trait]
pub trait TokenPropertiesCacheProvider: Send + Sync {
    async fn get_token_properties(
        &self,
        chain_id: ChainId,
        token: &Address,
    ) -> Option<TokenProperties>;

    async fn set_token_properties(
        &self,
        chain_id: ChainId,
        token: &Address,
        properties: &TokenProperties,
    );
}
