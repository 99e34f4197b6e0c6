//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the chain dependency graph and the concrete
//! adapters it is assembled from.
//!
//! # Available Ports
//!
//! - [`Clock`] - Time source for expiry decisions
//! - [`RouteCachingProvider`], [`PoolCacheProvider`], [`PairCacheProvider`],
//!   [`TokenPropertiesCacheProvider`] - Cache facades for the routing engine
//! - [`PoolProvider`], [`SubgraphProvider`] - Pool state and candidate pools
//! - [`TokenProvider`], [`TokenListProvider`], [`TokenValidator`],
//!   [`TokenFeeFetcher`], [`TokenPropertiesProvider`] - Token metadata
//! - [`GasPriceProvider`], [`Simulator`] - Gas pricing and estimation
//! - [`RpcEndpoint`], [`Multicall`], [`BatchMulticall`], [`QuoteProvider`] - Chain
//!   access and quoting
//! - [`OperatorPort`](inbound::operator::port::OperatorPort) - Capabilities the CLI
//!   drives

pub mod inbound;
pub mod outbound;

pub use outbound::cache::{
    PairCacheProvider, PoolCacheProvider, RouteCacheKey, RouteCachingProvider,
    TokenPropertiesCacheProvider,
};
pub use outbound::clock::{Clock, SystemClock};
pub use outbound::gas::{GasPriceProvider, SimulationRequest, Simulator};
pub use outbound::pool::{PoolProvider, SubgraphProvider};
pub use outbound::quote::{QuoteBatch, QuoteOptions, QuoteProvider};
pub use outbound::rpc::{
    BatchMulticall, BatchOptions, CallOutcome, Multicall, MulticallCall, RpcEndpoint,
};
pub use outbound::token::{
    TokenFeeFetcher, TokenListProvider, TokenPropertiesProvider, TokenProvider, TokenValidator,
};
