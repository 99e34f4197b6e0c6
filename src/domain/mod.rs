//! Chain-agnostic domain types shared by the store, the providers, and the
//! container.

pub mod contracts;
mod gas;
mod id;
mod pool;
mod protocol;
mod record;
mod token;
mod tuning;

pub use gas::GasPrice;
pub use id::{ActivityId, ChainId, SUPPORTED_CHAINS};
pub use pool::{PoolKeyed, SubgraphPool, V2Pair, V3Pool, V4Pool};
pub use protocol::{Protocol, TradeType};
pub use record::{
    expiry_from, is_live, CleanupReport, ErrorCountPolicy, ProviderHealthRecord, RouteRecord,
};
pub use token::{
    Token, TokenFee, TokenList, TokenListEntry, TokenProperties, TokenValidationResult,
};
pub use tuning::{
    BatchParams, BlockNumberConfig, BlockRollback, ChainTuning, FailureOverrides, RetryPolicy,
    TuningTable,
};
