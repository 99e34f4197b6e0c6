//! Container builder: assembles one dependency graph per supported chain.
//!
//! Chains are built concurrently on spawned tasks. A chain whose graph cannot
//! be built (no RPC endpoint) is recorded as an empty graph and does not
//! affect the others; a task that panics aborts the whole build.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::adapter::outbound::evm::{
    Eip1559GasPriceProvider, EthEstimateGasSimulator, MulticallClient, OnChainGasPriceProvider,
    OnChainQuoteProvider, OnChainTokenFeeFetcher, OnChainTokenProvider, OnChainTokenValidator,
    OnChainV2PairProvider, OnChainV3PoolProvider, OnChainV4PoolProvider, RpcClient,
};
use crate::adapter::outbound::memory::{
    CachingGasPriceProvider, CachingPoolProvider, CachingTokenListProvider,
    CachingTokenPropertiesProvider, CachingTokenProvider, CachingTokenValidator,
};
use crate::adapter::outbound::sqlite::CacheStore;
use crate::adapter::outbound::subgraph::StaticSubgraphProvider;
use crate::adapter::outbound::tokenlist::{unsupported_token_list, TokenListFetcher};
use crate::application::container::{
    ChainDependencyGraph, ChainProviders, Container, SubgraphProviders,
};
use crate::domain::{
    ActivityId, ChainId, Protocol, SubgraphPool, TokenList, TuningTable, SUPPORTED_CHAINS,
};
use crate::error::{BuildError, ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::{Clock, GasPriceProvider, Multicall, SystemClock, TokenListProvider};

const ALLOWED_LIST_NAME: &str = "Allowed Tokens";

/// How a chain's gas price is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasStrategy {
    /// Fee-market estimate on every call.
    Eip1559,
    /// Legacy or fee-market estimate behind the gas price ttl cache.
    CachedOnChain,
}

impl GasStrategy {
    #[must_use]
    pub fn for_chain(chain_id: ChainId) -> Self {
        match chain_id {
            ChainId::OPTIMISM | ChainId::BASE | ChainId::BLAST => Self::Eip1559,
            _ => Self::CachedOnChain,
        }
    }
}

/// State shared by every per-chain build task.
struct BuildContext {
    config: Config,
    store: Option<Arc<CacheStore>>,
    clock: Arc<dyn Clock>,
    tuning: TuningTable,
    allowed: TokenList,
    blocked: TokenList,
    seeds: Vec<SubgraphPool>,
    activity_id: ActivityId,
}

/// Builds a [`Container`] from configuration.
pub struct ContainerBuilder {
    config: Config,
    store: Option<Arc<CacheStore>>,
    clock: Arc<dyn Clock>,
    chains: Vec<ChainId>,
}

impl ContainerBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: None,
            clock: Arc::new(SystemClock),
            chains: SUPPORTED_CHAINS.to_vec(),
        }
    }

    /// Store that RPC clients report provider health into.
    #[must_use]
    pub fn store(mut self, store: Arc<CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Restrict the build to `chains`. Defaults to every supported chain.
    #[must_use]
    pub fn chains(mut self, chains: impl IntoIterator<Item = ChainId>) -> Self {
        self.chains = chains.into_iter().collect();
        self
    }

    /// Build every chain graph.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Fatal`] when a build task fails to complete.
    pub async fn build(self) -> Result<Container> {
        let activity_id = ActivityId::generate();
        info!(
            activity_id = %activity_id,
            chains = self.chains.len(),
            "Building chain container"
        );

        let fetcher = TokenListFetcher::new(Duration::from_millis(
            self.config.token_lists.fetch_timeout_ms,
        ));
        let allowed = fetcher
            .fetch_or_empty(
                self.config.allowed_token_list_url().as_ref(),
                ALLOWED_LIST_NAME,
            )
            .await;

        let ctx = Arc::new(BuildContext {
            seeds: self.config.subgraph.seeds(),
            config: self.config,
            store: self.store,
            clock: self.clock,
            tuning: TuningTable::standard(),
            allowed,
            blocked: unsupported_token_list(),
            activity_id: activity_id.clone(),
        });

        let handles: Vec<_> = self
            .chains
            .iter()
            .map(|chain_id| {
                let ctx = Arc::clone(&ctx);
                let chain_id = *chain_id;
                tokio::spawn(async move { build_chain_or_empty(&ctx, chain_id) })
            })
            .collect();

        let mut graphs = Vec::with_capacity(handles.len());
        for (chain_id, joined) in self.chains.iter().zip(join_all(handles).await) {
            let graph = joined.map_err(|e| {
                BuildError::Fatal(format!("build task for chain {chain_id} failed: {e}"))
            })?;
            graphs.push(graph);
        }

        let container = Container::new(graphs, activity_id);
        info!(
            activity_id = %container.activity_id(),
            loaded = container.loaded_chains().len(),
            "Chain container built"
        );
        Ok(container)
    }
}

fn build_chain_or_empty(ctx: &BuildContext, chain_id: ChainId) -> ChainDependencyGraph {
    match build_chain(ctx, chain_id) {
        Ok(graph) => {
            info!(
                activity_id = %ctx.activity_id,
                chain_id = %chain_id,
                chain = chain_id.name(),
                "Chain graph built"
            );
            graph
        }
        Err(e) => {
            warn!(
                activity_id = %ctx.activity_id,
                chain_id = %chain_id,
                error = %e,
                "Chain graph left empty"
            );
            ChainDependencyGraph::empty(chain_id)
        }
    }
}

#[allow(clippy::result_large_err)]
fn build_chain(ctx: &BuildContext, chain_id: ChainId) -> Result<ChainDependencyGraph> {
    let config = &ctx.config;
    let ttl = &config.cache;
    let url = config
        .rpc_endpoint(chain_id)
        .ok_or(ConfigError::MissingRpcEndpoint { chain_id })?;

    let rpc = Arc::new(RpcClient::connect(
        chain_id,
        url,
        config.rpc.timeout_for(chain_id),
        ctx.store.clone(),
    ));
    let multicall = Arc::new(MulticallClient::new(
        Arc::clone(&rpc),
        config.rpc.multicall_gas_limit_per_call,
    ));
    let calls: Arc<dyn Multicall> = multicall.clone();

    let v2_pools = Arc::new(CachingPoolProvider::new(
        chain_id,
        Arc::new(OnChainV2PairProvider::new(Arc::clone(&calls))),
        ttl.v2_pool_ttl_secs,
        Arc::clone(&ctx.clock),
    ));
    let v3_pools = Arc::new(CachingPoolProvider::new(
        chain_id,
        Arc::new(OnChainV3PoolProvider::new(Arc::clone(&calls))),
        ttl.v3_pool_ttl_secs,
        Arc::clone(&ctx.clock),
    ));
    let v4_pools = Arc::new(CachingPoolProvider::new(
        chain_id,
        Arc::new(OnChainV4PoolProvider::new(chain_id, Arc::clone(&calls))),
        ttl.v4_pool_ttl_secs,
        Arc::clone(&ctx.clock),
    ));

    let allowed_tokens: Arc<dyn TokenListProvider> = Arc::new(
        CachingTokenListProvider::from_list(chain_id, ctx.allowed.clone()),
    );
    let blocked_tokens: Arc<dyn TokenListProvider> = Arc::new(
        CachingTokenListProvider::from_list(chain_id, ctx.blocked.clone()),
    );
    let tokens = Arc::new(CachingTokenProvider::new(
        chain_id,
        Arc::clone(&allowed_tokens),
        Arc::new(OnChainTokenProvider::new(chain_id, Arc::clone(&calls))),
        ttl.token_ttl_secs,
        Arc::clone(&ctx.clock),
    ));
    let token_validator = Arc::new(CachingTokenValidator::new(
        Arc::new(OnChainTokenValidator::new(
            Arc::clone(&calls),
            config.token_detection.validator(chain_id),
        )),
        ttl.token_validator_ttl_secs,
        Arc::clone(&ctx.clock),
    ));
    let token_properties = Arc::new(CachingTokenPropertiesProvider::new(
        chain_id,
        Arc::new(OnChainTokenFeeFetcher::new(
            Arc::clone(&calls),
            config.token_detection.fee_detector(chain_id),
        )),
        ttl.token_properties_ttl_secs,
        Arc::clone(&ctx.clock),
    ));

    let gas_price = gas_price_provider(
        GasStrategy::for_chain(chain_id),
        &rpc,
        ttl.gas_price_ttl_secs,
        Arc::clone(&ctx.clock),
    );
    let quotes = Arc::new(OnChainQuoteProvider::new(
        multicall,
        ctx.tuning.for_chain(chain_id),
    ));
    let simulator = Arc::new(EthEstimateGasSimulator::new(Arc::clone(&rpc)));

    let subgraphs = SubgraphProviders {
        v2: Arc::new(StaticSubgraphProvider::new(chain_id, Protocol::V2, &ctx.seeds)),
        v3: Arc::new(StaticSubgraphProvider::new(chain_id, Protocol::V3, &ctx.seeds)),
        v4: Arc::new(StaticSubgraphProvider::new(chain_id, Protocol::V4, &ctx.seeds)),
    };

    Ok(ChainDependencyGraph::loaded(
        chain_id,
        ChainProviders {
            rpc,
            multicall: calls,
            v2_pools,
            v3_pools,
            v4_pools,
            tokens,
            allowed_tokens,
            blocked_tokens,
            token_validator,
            token_properties,
            gas_price,
            quotes,
            simulator,
            subgraphs,
        },
    ))
}

fn gas_price_provider(
    strategy: GasStrategy,
    rpc: &Arc<RpcClient>,
    ttl_secs: u64,
    clock: Arc<dyn Clock>,
) -> Arc<dyn GasPriceProvider> {
    match strategy {
        GasStrategy::Eip1559 => Arc::new(Eip1559GasPriceProvider::new(Arc::clone(rpc))),
        GasStrategy::CachedOnChain => Arc::new(CachingGasPriceProvider::new(
            Arc::new(OnChainGasPriceProvider::new(Arc::clone(rpc))),
            ttl_secs,
            clock,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> Config {
        Config::parse_toml_with_env(toml, |_| None).unwrap()
    }

    #[test]
    fn gas_strategy_table() {
        assert_eq!(GasStrategy::for_chain(ChainId::OPTIMISM), GasStrategy::Eip1559);
        assert_eq!(GasStrategy::for_chain(ChainId::BASE), GasStrategy::Eip1559);
        assert_eq!(GasStrategy::for_chain(ChainId::BLAST), GasStrategy::Eip1559);
        assert_eq!(
            GasStrategy::for_chain(ChainId::MAINNET),
            GasStrategy::CachedOnChain
        );
        assert_eq!(
            GasStrategy::for_chain(ChainId::ARBITRUM_ONE),
            GasStrategy::CachedOnChain
        );
    }

    #[tokio::test]
    async fn chains_without_endpoints_stay_empty() {
        let config = config(
            r#"
            [rpc.endpoints]
            "8453" = "http://127.0.0.1:1"
            "#,
        );
        let container = ContainerBuilder::new(config)
            .chains([ChainId::MAINNET, ChainId::BASE])
            .build()
            .await
            .unwrap();

        assert_eq!(container.loaded_chains(), vec![ChainId::BASE]);
        let mainnet = container.graph(ChainId::MAINNET).unwrap();
        assert!(mainnet.rpc().is_none());
        assert!(mainnet.features().v4_supported);

        let base = container.graph(ChainId::BASE).unwrap();
        let rpc = base.rpc().unwrap();
        assert_eq!(rpc.chain_id(), ChainId::BASE);
        assert_eq!(rpc.provider_name(), "127.0.0.1");
        assert!(base.features().mixed_supported);
    }

    #[tokio::test]
    async fn builds_every_supported_chain_by_default() {
        let container = ContainerBuilder::new(config("")).build().await.unwrap();
        assert_eq!(container.graphs().count(), SUPPORTED_CHAINS.len());
        assert!(container.loaded_chains().is_empty());
        assert!(!container.activity_id().as_str().is_empty());
    }

    #[tokio::test]
    async fn seed_pools_reach_the_subgraph_providers() {
        let config = config(
            r#"
            [rpc.endpoints]
            "1" = "http://127.0.0.1:1"

            [[subgraph.seed_pools]]
            chain_id = 1
            protocol = "v3"
            id = "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640"
            token0 = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
            token1 = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
            fee_tier = 500
            tvl_usd = 1000000.0
            "#,
        );
        let container = ContainerBuilder::new(config)
            .chains([ChainId::MAINNET])
            .build()
            .await
            .unwrap();
        let providers = container.graph(ChainId::MAINNET).unwrap().providers().unwrap();
        assert_eq!(providers.subgraphs.v3.get_pools(None, None).await.unwrap().len(), 1);
        assert!(providers.subgraphs.v2.get_pools(None, None).await.unwrap().is_empty());
    }
}
