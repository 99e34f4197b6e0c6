//! Per-chain dependency graphs and the immutable container that holds them.
//!
//! A [`ChainDependencyGraph`] bundles everything the routing engine needs to
//! serve one chain. Graphs are only ever built by the container builder; once
//! the [`Container`] is assembled it is read-only and shared behind an `Arc`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{ActivityId, ChainId, V2Pair, V3Pool, V4Pool};
use crate::port::{
    GasPriceProvider, Multicall, PoolProvider, QuoteProvider, RpcEndpoint, Simulator,
    SubgraphProvider, TokenListProvider, TokenPropertiesProvider, TokenProvider, TokenValidator,
};

const V2_CHAINS: [ChainId; 3] = [ChainId::MAINNET, ChainId::POLYGON, ChainId::BNB];
const V4_CHAINS: [ChainId; 2] = [ChainId::MAINNET, ChainId::SEPOLIA];
const MIXED_CHAINS: [ChainId; 4] = [
    ChainId::MAINNET,
    ChainId::BASE,
    ChainId::ARBITRUM_ONE,
    ChainId::OPTIMISM,
];

/// Routing features enabled for a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub v2_supported: bool,
    pub v4_supported: bool,
    pub mixed_supported: bool,
}

impl FeatureFlags {
    /// Flags from the fixed per-chain allow-lists.
    #[must_use]
    pub fn for_chain(chain_id: ChainId) -> Self {
        Self {
            v2_supported: V2_CHAINS.contains(&chain_id),
            v4_supported: V4_CHAINS.contains(&chain_id),
            mixed_supported: MIXED_CHAINS.contains(&chain_id),
        }
    }
}

/// Subgraph providers, one per protocol.
#[derive(Clone)]
pub struct SubgraphProviders {
    pub v2: Arc<dyn SubgraphProvider>,
    pub v3: Arc<dyn SubgraphProvider>,
    pub v4: Arc<dyn SubgraphProvider>,
}

/// Live collaborators for a chain with a configured RPC endpoint.
#[derive(Clone)]
pub struct ChainProviders {
    pub rpc: Arc<dyn RpcEndpoint>,
    pub multicall: Arc<dyn Multicall>,
    pub v2_pools: Arc<dyn PoolProvider<V2Pair>>,
    pub v3_pools: Arc<dyn PoolProvider<V3Pool>>,
    pub v4_pools: Arc<dyn PoolProvider<V4Pool>>,
    pub tokens: Arc<dyn TokenProvider>,
    pub allowed_tokens: Arc<dyn TokenListProvider>,
    pub blocked_tokens: Arc<dyn TokenListProvider>,
    pub token_validator: Arc<dyn TokenValidator>,
    pub token_properties: Arc<dyn TokenPropertiesProvider>,
    pub gas_price: Arc<dyn GasPriceProvider>,
    pub quotes: Arc<dyn QuoteProvider>,
    pub simulator: Arc<dyn Simulator>,
    pub subgraphs: SubgraphProviders,
}

/// Everything needed to route on one chain.
///
/// A graph without providers records a chain that is supported but has no
/// usable endpoint.
#[derive(Clone)]
pub struct ChainDependencyGraph {
    chain_id: ChainId,
    providers: Option<ChainProviders>,
    features: FeatureFlags,
}

impl ChainDependencyGraph {
    #[must_use]
    pub fn loaded(chain_id: ChainId, providers: ChainProviders) -> Self {
        Self {
            chain_id,
            providers: Some(providers),
            features: FeatureFlags::for_chain(chain_id),
        }
    }

    #[must_use]
    pub fn empty(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            providers: None,
            features: FeatureFlags::for_chain(chain_id),
        }
    }

    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    #[must_use]
    pub fn providers(&self) -> Option<&ChainProviders> {
        self.providers.as_ref()
    }

    /// The RPC endpoint, present only for loaded chains.
    #[must_use]
    pub fn rpc(&self) -> Option<&Arc<dyn RpcEndpoint>> {
        self.providers.as_ref().map(|p| &p.rpc)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.providers.is_some()
    }

    #[must_use]
    pub fn features(&self) -> FeatureFlags {
        self.features
    }
}

impl std::fmt::Debug for ChainDependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainDependencyGraph")
            .field("chain_id", &self.chain_id)
            .field(
                "provider_name",
                &self.rpc().map(|rpc| rpc.provider_name().to_string()),
            )
            .field("features", &self.features)
            .finish()
    }
}

/// Immutable map of chain graphs produced by one build.
#[derive(Debug)]
pub struct Container {
    graphs: BTreeMap<ChainId, ChainDependencyGraph>,
    activity_id: ActivityId,
}

impl Container {
    pub fn new(
        graphs: impl IntoIterator<Item = ChainDependencyGraph>,
        activity_id: ActivityId,
    ) -> Self {
        Self {
            graphs: graphs.into_iter().map(|g| (g.chain_id(), g)).collect(),
            activity_id,
        }
    }

    /// Graph for a chain. Supported chains without an endpoint still have one.
    #[must_use]
    pub fn graph(&self, chain_id: ChainId) -> Option<&ChainDependencyGraph> {
        self.graphs.get(&chain_id)
    }

    /// Every graph, ordered by chain id.
    pub fn graphs(&self) -> impl Iterator<Item = &ChainDependencyGraph> {
        self.graphs.values()
    }

    /// Chains whose graph has an RPC endpoint, in ascending order.
    #[must_use]
    pub fn loaded_chains(&self) -> Vec<ChainId> {
        self.graphs
            .values()
            .filter(|g| g.is_loaded())
            .map(ChainDependencyGraph::chain_id)
            .collect()
    }

    /// Correlation id of the build that produced this container.
    #[must_use]
    pub fn activity_id(&self) -> &ActivityId {
        &self.activity_id
    }
}
