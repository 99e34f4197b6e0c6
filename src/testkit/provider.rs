//! Stub provider implementations for testing decorators and the container.
//!
//! Every stub counts how often it was called so tests can assert that a
//! caching layer actually absorbed repeat lookups.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{ChainId, GasPrice, PoolKeyed, Token, TokenFee};
use crate::error::{Result, RpcError};
use crate::port::{
    BatchMulticall, BatchOptions, CallOutcome, GasPriceProvider, MulticallCall, PoolProvider,
    TokenFeeFetcher, TokenProvider,
};

// ---------------------------------------------------------------------------
// Pools
// ---------------------------------------------------------------------------

/// Serves a fixed set of pools, returning those whose key was requested.
pub struct StaticPoolProvider<P> {
    pools: Vec<P>,
    calls: AtomicUsize,
}

impl<P> StaticPoolProvider<P> {
    pub fn new(pools: Vec<P>) -> Self {
        Self {
            pools,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: PoolKeyed> PoolProvider<P> for StaticPoolProvider<P> {
    async fn get_pools(&self, keys: &[P::Key], _block_number: Option<u64>) -> Result<Vec<P>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pools
            .iter()
            .filter(|pool| keys.contains(&pool.pool_key()))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Serves a fixed set of tokens by address.
pub struct StaticTokenProvider {
    tokens: Vec<Token>,
    calls: AtomicUsize,
}

impl StaticTokenProvider {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_tokens(&self, addresses: &[Address]) -> Result<Vec<Token>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .tokens
            .iter()
            .filter(|token| addresses.contains(&token.address))
            .cloned()
            .collect())
    }
}

/// Returns pre-seeded fee detection results.
pub struct StaticFeeFetcher {
    fees: HashMap<Address, TokenFee>,
    calls: AtomicUsize,
}

impl StaticFeeFetcher {
    pub fn new(fees: impl IntoIterator<Item = (Address, TokenFee)>) -> Self {
        Self {
            fees: fees.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenFeeFetcher for StaticFeeFetcher {
    async fn fetch_fees(&self, tokens: &[Address]) -> Result<HashMap<Address, TokenFee>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(tokens
            .iter()
            .filter_map(|token| self.fees.get(token).map(|fee| (*token, *fee)))
            .collect())
    }
}

/// A fee fetcher whose every call fails.
#[derive(Default)]
pub struct FailingFeeFetcher {
    calls: AtomicUsize,
}

impl FailingFeeFetcher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenFeeFetcher for FailingFeeFetcher {
    async fn fetch_fees(&self, _tokens: &[Address]) -> Result<HashMap<Address, TokenFee>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RpcError::Call {
            provider: "stub".into(),
            method: "eth_call",
            reason: "detector reverted".into(),
        }
        .into())
    }
}

// ---------------------------------------------------------------------------
// Gas
// ---------------------------------------------------------------------------

/// Always reports the same gas price.
pub struct CountingGasPriceProvider {
    price: GasPrice,
    calls: AtomicUsize,
}

impl CountingGasPriceProvider {
    pub fn new(price: GasPrice) -> Self {
        Self {
            price,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GasPriceProvider for CountingGasPriceProvider {
    async fn gas_price(&self, _block_number: Option<u64>) -> Result<GasPrice> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.price)
    }
}

// ---------------------------------------------------------------------------
// Multicall
// ---------------------------------------------------------------------------

type ScriptedBatch = std::result::Result<Vec<bool>, RpcError>;

/// Replays scripted batch results and records the options of every batch.
///
/// Each step gives the success flag of every call in the batch. Once the
/// script runs out every call succeeds.
pub struct ScriptedMulticall {
    chain_id: ChainId,
    head: u64,
    script: Mutex<VecDeque<ScriptedBatch>>,
    batches: Mutex<Vec<BatchOptions>>,
}

impl ScriptedMulticall {
    pub fn new(chain_id: ChainId, head: u64) -> Self {
        Self {
            chain_id,
            head,
            script: Mutex::new(VecDeque::new()),
            batches: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn then_return(self, successes: &[bool]) -> Self {
        self.script.lock().push_back(Ok(successes.to_vec()));
        self
    }

    #[must_use]
    pub fn then_fail(self, error: RpcError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Options of every batch sent so far, in order.
    pub fn batches(&self) -> Vec<BatchOptions> {
        self.batches.lock().clone()
    }
}

#[async_trait]
impl BatchMulticall for ScriptedMulticall {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    async fn head_block_number(&self) -> Result<u64> {
        Ok(self.head)
    }

    async fn aggregate_with(
        &self,
        calls: &[MulticallCall],
        options: BatchOptions,
    ) -> std::result::Result<Vec<CallOutcome>, RpcError> {
        self.batches.lock().push(options);
        let step = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![true; calls.len()]));
        Ok(step?
            .into_iter()
            .map(|success| CallOutcome {
                success,
                return_data: Bytes::new(),
            })
            .collect())
    }
}
