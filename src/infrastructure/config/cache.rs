//! In-memory cache lifetimes for the per-chain providers.

use serde::Deserialize;

/// `[cache]` section. All values are seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub v2_pool_ttl_secs: u64,
    pub v3_pool_ttl_secs: u64,
    pub v4_pool_ttl_secs: u64,
    pub token_validator_ttl_secs: u64,
    pub token_properties_ttl_secs: u64,
    pub token_ttl_secs: u64,
    pub gas_price_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            v2_pool_ttl_secs: 180,
            v3_pool_ttl_secs: 180,
            v4_pool_ttl_secs: 180,
            token_validator_ttl_secs: 30_000,
            token_properties_ttl_secs: 30_000,
            token_ttl_secs: 3600,
            gas_price_ttl_secs: 15,
        }
    }
}
