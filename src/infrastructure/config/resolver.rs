//! Request-time chain resolution settings.

use serde::Deserialize;

use crate::application::resolver::{ChainResolver, UnresolvedChainPolicy};
use crate::domain::ChainId;

/// `[resolver]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Chain served when a request names none.
    pub primary_chain: u64,
    pub unresolved_chain: UnresolvedChainPolicy,
}

impl ResolverConfig {
    #[must_use]
    pub fn primary_chain(&self) -> ChainId {
        ChainId::new(self.primary_chain)
    }

    #[must_use]
    pub fn resolver(&self) -> ChainResolver {
        ChainResolver::new(self.primary_chain(), self.unresolved_chain)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            primary_chain: ChainId::MAINNET.get(),
            unresolved_chain: UnresolvedChainPolicy::default(),
        }
    }
}
