//! In-memory adapters: the ttl cache and the caching decorators built on it.

pub mod gas;
pub mod pool;
pub mod token;
pub mod ttl;

pub use gas::CachingGasPriceProvider;
pub use pool::CachingPoolProvider;
pub use token::{
    CachingTokenListProvider, CachingTokenPropertiesProvider, CachingTokenProvider,
    CachingTokenValidator,
};
pub use ttl::TtlCache;
