//! Token list sources and per-chain token detector contracts.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use serde::Deserialize;

use crate::adapter::outbound::evm::DetectorContract;
use crate::domain::ChainId;

/// `[token_lists]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenListsConfig {
    /// Allowed token list document. Unset means an empty allowed list.
    pub allowed_url: Option<String>,
    pub fetch_timeout_ms: u64,
}

impl Default for TokenListsConfig {
    fn default() -> Self {
        Self {
            allowed_url: None,
            fetch_timeout_ms: 5000,
        }
    }
}

/// `[token_detection]` section, keyed by chain id.
///
/// ```toml
/// [token_detection.chains.1]
/// validator = "0x..."
/// fee_detector = "0x..."
/// base_tokens = ["0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"]
/// amount_to_borrow = "1000"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenDetectionConfig {
    pub chains: HashMap<String, ChainDetectorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainDetectorConfig {
    #[serde(default)]
    pub validator: Option<Address>,
    #[serde(default)]
    pub fee_detector: Option<Address>,
    #[serde(default)]
    pub base_tokens: Vec<Address>,
    #[serde(default = "default_amount_to_borrow")]
    pub amount_to_borrow: U256,
}

fn default_amount_to_borrow() -> U256 {
    U256::from(1000u64)
}

impl TokenDetectionConfig {
    fn chain(&self, chain_id: ChainId) -> Option<&ChainDetectorConfig> {
        self.chains.get(&chain_id.to_string())
    }

    #[must_use]
    pub fn validator(&self, chain_id: ChainId) -> Option<DetectorContract> {
        let chain = self.chain(chain_id)?;
        Some(DetectorContract {
            address: chain.validator?,
            base_tokens: chain.base_tokens.clone(),
            amount_to_borrow: chain.amount_to_borrow,
        })
    }

    #[must_use]
    pub fn fee_detector(&self, chain_id: ChainId) -> Option<DetectorContract> {
        let chain = self.chain(chain_id)?;
        Some(DetectorContract {
            address: chain.fee_detector?,
            base_tokens: chain.base_tokens.clone(),
            amount_to_borrow: chain.amount_to_borrow,
        })
    }
}
