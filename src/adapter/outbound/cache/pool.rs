//! Pool and pair cache facades.

use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::error;

use super::key::{v2_pair_key, v3_pool_key};
use crate::adapter::outbound::sqlite::CacheStore;
use crate::domain::{ChainId, V2Pair, V3Pool};
use crate::port::{PairCacheProvider, PoolCacheProvider};

/// Default lifetime of a cached pool or pair snapshot.
pub const POOL_TTL_SECS: i64 = 900;

pub struct V3PoolCache {
    store: Arc<CacheStore>,
    ttl_secs: i64,
}

impl V3PoolCache {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self {
            store,
            ttl_secs: POOL_TTL_SECS,
        }
    }
}

#[async_trait]
impl PoolCacheProvider for V3PoolCache {
    async fn get_pool(&self, chain_id: ChainId, address: &Address) -> Option<V3Pool> {
        match self.store.get(&v3_pool_key(chain_id, address)).await {
            Ok(pool) => pool,
            Err(e) => {
                error!(error = %e, %chain_id, pool = %address, "Error getting V3 pool from cache");
                None
            }
        }
    }

    async fn set_pool(&self, chain_id: ChainId, pool: &V3Pool) {
        let key = v3_pool_key(chain_id, &pool.address);
        if let Err(e) = self.store.set(&key, pool, self.ttl_secs).await {
            error!(error = %e, %chain_id, pool = %pool.address, "Error setting V3 pool in cache");
        }
    }
}

pub struct V2PairCache {
    store: Arc<CacheStore>,
    ttl_secs: i64,
}

impl V2PairCache {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self {
            store,
            ttl_secs: POOL_TTL_SECS,
        }
    }
}

#[async_trait]
impl PairCacheProvider for V2PairCache {
    async fn get_pair(&self, chain_id: ChainId, address: &Address) -> Option<V2Pair> {
        match self.store.get(&v2_pair_key(chain_id, address)).await {
            Ok(pair) => pair,
            Err(e) => {
                error!(error = %e, %chain_id, pair = %address, "Error getting V2 pair from cache");
                None
            }
        }
    }

    async fn set_pair(&self, chain_id: ChainId, pair: &V2Pair) {
        let key = v2_pair_key(chain_id, &pair.address);
        if let Err(e) = self.store.set(&key, pair, self.ttl_secs).await {
            error!(error = %e, %chain_id, pair = %pair.address, "Error setting V2 pair in cache");
        }
    }
}
