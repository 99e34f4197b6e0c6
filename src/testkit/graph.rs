//! Loaded chain graphs backed by inert collaborators.
//!
//! [`NullChain`] answers every port with empty results so resolver and
//! container tests can build a loaded graph without a network.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::application::container::{ChainDependencyGraph, ChainProviders, SubgraphProviders};
use crate::domain::{
    ChainId, GasPrice, PoolKeyed, Protocol, SubgraphPool, Token, TokenList, TokenProperties,
    TokenValidationResult,
};
use crate::error::Result;
use crate::port::{
    CallOutcome, GasPriceProvider, Multicall, MulticallCall, PoolProvider, QuoteBatch,
    QuoteOptions, QuoteProvider, RpcEndpoint, SimulationRequest, Simulator, SubgraphProvider,
    TokenListProvider, TokenPropertiesProvider, TokenProvider, TokenValidator,
};

/// A chain that exists but holds no state.
pub struct NullChain {
    chain_id: ChainId,
    block_number: u64,
    list: Arc<TokenList>,
}

impl NullChain {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            block_number: 1,
            list: Arc::new(TokenList::empty("null")),
        }
    }
}

#[async_trait]
impl RpcEndpoint for NullChain {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    fn provider_name(&self) -> &str {
        "null"
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.block_number)
    }
}

#[async_trait]
impl Multicall for NullChain {
    fn address(&self) -> Address {
        Address::ZERO
    }

    async fn aggregate(
        &self,
        calls: &[MulticallCall],
        _block_number: Option<u64>,
    ) -> Result<Vec<CallOutcome>> {
        Ok(calls
            .iter()
            .map(|_| CallOutcome {
                success: false,
                return_data: Bytes::new(),
            })
            .collect())
    }
}

#[async_trait]
impl<P: PoolKeyed> PoolProvider<P> for NullChain {
    async fn get_pools(&self, _keys: &[P::Key], _block_number: Option<u64>) -> Result<Vec<P>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl TokenProvider for NullChain {
    async fn get_tokens(&self, _addresses: &[Address]) -> Result<Vec<Token>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl TokenListProvider for NullChain {
    async fn token_list(&self) -> Arc<TokenList> {
        Arc::clone(&self.list)
    }

    async fn token_by_address(&self, _address: &Address) -> Option<Token> {
        None
    }
}

#[async_trait]
impl TokenValidator for NullChain {
    async fn validate(
        &self,
        tokens: &[Address],
    ) -> Result<HashMap<Address, TokenValidationResult>> {
        Ok(tokens
            .iter()
            .map(|t| (*t, TokenValidationResult::Unknown))
            .collect())
    }
}

#[async_trait]
impl TokenPropertiesProvider for NullChain {
    async fn get_properties(
        &self,
        tokens: &[Address],
    ) -> Result<HashMap<Address, TokenProperties>> {
        Ok(tokens
            .iter()
            .map(|t| (*t, TokenProperties::standard()))
            .collect())
    }
}

#[async_trait]
impl GasPriceProvider for NullChain {
    async fn gas_price(&self, _block_number: Option<u64>) -> Result<GasPrice> {
        Ok(GasPrice::legacy(0))
    }
}

#[async_trait]
impl QuoteProvider for NullChain {
    fn quoter_address(&self, _options: &QuoteOptions) -> Result<Address> {
        Ok(Address::ZERO)
    }

    async fn block_number(&self, _attempt: u32) -> Result<u64> {
        Ok(self.block_number)
    }

    async fn quote(&self, call_data: &[Bytes], _options: QuoteOptions) -> Result<QuoteBatch> {
        Ok(QuoteBatch {
            quoter: Address::ZERO,
            block_number: self.block_number,
            attempts: 1,
            outcomes: call_data
                .iter()
                .map(|_| CallOutcome {
                    success: false,
                    return_data: Bytes::new(),
                })
                .collect(),
        })
    }
}

#[async_trait]
impl Simulator for NullChain {
    async fn estimate_gas(&self, _request: &SimulationRequest) -> Result<u64> {
        Ok(0)
    }
}

struct NullSubgraph(Protocol);

#[async_trait]
impl SubgraphProvider for NullSubgraph {
    fn protocol(&self) -> Protocol {
        self.0
    }

    async fn get_pools(
        &self,
        _token_in: Option<Address>,
        _token_out: Option<Address>,
    ) -> Result<Vec<SubgraphPool>> {
        Ok(Vec::new())
    }
}

/// A loaded graph for `chain_id` whose collaborators are all [`NullChain`].
pub fn loaded_graph(chain_id: ChainId) -> ChainDependencyGraph {
    let chain = Arc::new(NullChain::new(chain_id));
    let providers = ChainProviders {
        rpc: chain.clone(),
        multicall: chain.clone(),
        v2_pools: chain.clone(),
        v3_pools: chain.clone(),
        v4_pools: chain.clone(),
        tokens: chain.clone(),
        allowed_tokens: chain.clone(),
        blocked_tokens: chain.clone(),
        token_validator: chain.clone(),
        token_properties: chain.clone(),
        gas_price: chain.clone(),
        quotes: chain.clone(),
        simulator: chain,
        subgraphs: SubgraphProviders {
            v2: Arc::new(NullSubgraph(Protocol::V2)),
            v3: Arc::new(NullSubgraph(Protocol::V3)),
            v4: Arc::new(NullSubgraph(Protocol::V4)),
        },
    };
    ChainDependencyGraph::loaded(chain_id, providers)
}
