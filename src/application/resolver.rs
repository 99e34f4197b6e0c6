//! Request-time chain resolution.
//!
//! Maps the chain ids carried by a quote request onto a loaded
//! [`ChainDependencyGraph`].

use serde::Deserialize;
use tracing::{debug, warn};

use super::container::{ChainDependencyGraph, Container};
use crate::domain::ChainId;
use crate::error::ResolveError;

/// What to do when the requested chain has no usable graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedChainPolicy {
    /// Fail the request.
    #[default]
    Reject,
    /// Serve the request from the primary chain.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainResolver {
    primary_chain: ChainId,
    policy: UnresolvedChainPolicy,
}

impl ChainResolver {
    #[must_use]
    pub fn new(primary_chain: ChainId, policy: UnresolvedChainPolicy) -> Self {
        Self {
            primary_chain,
            policy,
        }
    }

    #[must_use]
    pub fn primary_chain(&self) -> ChainId {
        self.primary_chain
    }

    /// Pick the graph for a request.
    ///
    /// Token chain ids must be both absent or both present and equal. With
    /// none given the primary chain is used.
    pub fn resolve<'c>(
        &self,
        container: &'c Container,
        token_in: Option<ChainId>,
        token_out: Option<ChainId>,
    ) -> Result<&'c ChainDependencyGraph, ResolveError> {
        let requested = match (token_in, token_out) {
            (Some(a), Some(b)) if a == b => a,
            (None, None) => self.primary_chain,
            _ => {
                return Err(ResolveError::Validation {
                    token_in,
                    token_out,
                })
            }
        };

        if let Some(graph) = usable(container, requested) {
            return Ok(graph);
        }

        match self.policy {
            UnresolvedChainPolicy::Reject => {
                debug!(chain_id = %requested, "Rejecting request for unloaded chain");
                Err(unresolved(container, requested))
            }
            UnresolvedChainPolicy::Fallback => {
                warn!(
                    chain_id = %requested,
                    primary_chain = %self.primary_chain,
                    "Chain not loaded, falling back to primary chain"
                );
                usable(container, self.primary_chain)
                    .ok_or_else(|| unresolved(container, requested))
            }
        }
    }
}

impl Default for ChainResolver {
    fn default() -> Self {
        Self::new(ChainId::MAINNET, UnresolvedChainPolicy::default())
    }
}

fn usable(container: &Container, chain_id: ChainId) -> Option<&ChainDependencyGraph> {
    container.graph(chain_id).filter(|g| g.rpc().is_some())
}

fn unresolved(container: &Container, requested: ChainId) -> ResolveError {
    ResolveError::UnresolvedChain {
        requested,
        loaded: container.loaded_chains(),
    }
}
