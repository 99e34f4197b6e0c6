//! RPC endpoint and timeout configuration.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::ChainId;

/// `[rpc]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    pub default_timeout_ms: u64,
    /// Timeout for the chains in `extended_timeout_chains`.
    pub extended_timeout_ms: u64,
    pub extended_timeout_chains: Vec<u64>,
    pub multicall_gas_limit_per_call: u64,
    /// Chain id to endpoint URL. `WEB3_RPC_{chain_id}` wins over entries here.
    pub endpoints: HashMap<String, String>,
}

impl RpcConfig {
    #[must_use]
    pub fn timeout_for(&self, chain_id: ChainId) -> Duration {
        if self.extended_timeout_chains.contains(&chain_id.get()) {
            Duration::from_millis(self.extended_timeout_ms)
        } else {
            Duration::from_millis(self.default_timeout_ms)
        }
    }

    /// Configured endpoint for a chain, ignoring blank entries.
    #[must_use]
    pub fn endpoint(&self, chain_id: ChainId) -> Option<&str> {
        self.endpoints
            .get(&chain_id.to_string())
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 5000,
            extended_timeout_ms: 8000,
            extended_timeout_chains: vec![ChainId::ARBITRUM_ONE.get()],
            multicall_gas_limit_per_call: 375_000,
            endpoints: HashMap::new(),
        }
    }
}
