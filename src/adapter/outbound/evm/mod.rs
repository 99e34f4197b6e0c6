//! EVM adapters: the instrumented RPC client and everything that reads chain
//! state through it.

pub mod gas;
pub mod multicall;
pub mod pool;
pub mod quote;
pub mod rpc;
pub mod token;

pub use gas::{
    EthEstimateGasSimulator, Eip1559GasPriceProvider, LegacyGasPriceProvider,
    OnChainGasPriceProvider,
};
pub use multicall::MulticallClient;
pub use pool::{OnChainV2PairProvider, OnChainV3PoolProvider, OnChainV4PoolProvider};
pub use quote::OnChainQuoteProvider;
pub use rpc::{derive_provider_name, RpcClient};
pub use token::{
    DetectorContract, OnChainTokenFeeFetcher, OnChainTokenProvider, OnChainTokenValidator,
};
