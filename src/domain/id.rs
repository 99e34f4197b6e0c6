//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// EVM chain identifier - newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u64);

impl ChainId {
    pub const MAINNET: Self = Self(1);
    pub const OPTIMISM: Self = Self(10);
    pub const BNB: Self = Self(56);
    pub const UNICHAIN: Self = Self(130);
    pub const POLYGON: Self = Self(137);
    pub const ZKSYNC: Self = Self(324);
    pub const WORLDCHAIN: Self = Self(480);
    pub const UNICHAIN_SEPOLIA: Self = Self(1301);
    pub const SONEIUM: Self = Self(1868);
    pub const BASE: Self = Self(8453);
    pub const MONAD_TESTNET: Self = Self(10143);
    pub const ARBITRUM_ONE: Self = Self(42161);
    pub const CELO: Self = Self(42220);
    pub const AVALANCHE: Self = Self(43114);
    pub const CELO_ALFAJORES: Self = Self(44787);
    pub const BLAST: Self = Self(81457);
    pub const BASE_SEPOLIA: Self = Self(84532);
    pub const ZORA: Self = Self(7_777_777);
    pub const SEPOLIA: Self = Self(11_155_111);

    /// Create a new `ChainId` from its numeric value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the numeric chain id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Human-readable network name for well-known chains.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MAINNET => "mainnet",
            Self::OPTIMISM => "optimism",
            Self::BNB => "bnb",
            Self::UNICHAIN => "unichain",
            Self::POLYGON => "polygon",
            Self::ZKSYNC => "zksync",
            Self::WORLDCHAIN => "worldchain",
            Self::UNICHAIN_SEPOLIA => "unichain-sepolia",
            Self::SONEIUM => "soneium",
            Self::BASE => "base",
            Self::MONAD_TESTNET => "monad-testnet",
            Self::ARBITRUM_ONE => "arbitrum",
            Self::CELO => "celo",
            Self::AVALANCHE => "avalanche",
            Self::CELO_ALFAJORES => "celo-alfajores",
            Self::BLAST => "blast",
            Self::BASE_SEPOLIA => "base-sepolia",
            Self::ZORA => "zora",
            Self::SEPOLIA => "sepolia",
            _ => "unknown",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Every chain the container builds a dependency graph for.
pub const SUPPORTED_CHAINS: [ChainId; 19] = [
    ChainId::MAINNET,
    ChainId::OPTIMISM,
    ChainId::ARBITRUM_ONE,
    ChainId::POLYGON,
    ChainId::SEPOLIA,
    ChainId::CELO,
    ChainId::CELO_ALFAJORES,
    ChainId::BNB,
    ChainId::AVALANCHE,
    ChainId::BASE,
    ChainId::BLAST,
    ChainId::ZORA,
    ChainId::ZKSYNC,
    ChainId::WORLDCHAIN,
    ChainId::UNICHAIN_SEPOLIA,
    ChainId::MONAD_TESTNET,
    ChainId::BASE_SEPOLIA,
    ChainId::UNICHAIN,
    ChainId::SONEIUM,
];

/// Correlation id for one container build.
///
/// Attached to every log line emitted while the container is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityId(String);

impl ActivityId {
    /// Generate a new random activity id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the activity id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn supported_chains_are_unique() {
        let unique: HashSet<_> = SUPPORTED_CHAINS.iter().collect();
        assert_eq!(unique.len(), SUPPORTED_CHAINS.len());
    }

    #[test]
    fn chain_id_displays_numeric_value() {
        assert_eq!(ChainId::ARBITRUM_ONE.to_string(), "42161");
        assert_eq!(ChainId::from(8453), ChainId::BASE);
    }

    #[test]
    fn chain_id_deserializes_from_number() {
        let id: ChainId = serde_json::from_str("137").unwrap();
        assert_eq!(id, ChainId::POLYGON);
        assert_eq!(id.name(), "polygon");
    }

    #[test]
    fn activity_ids_are_distinct() {
        assert_ne!(ActivityId::generate(), ActivityId::generate());
    }
}
