//! Shared helper routines for operator implementations.

use std::sync::Arc;

use crate::adapter::outbound::sqlite::CacheStore;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::SystemClock;

#[allow(clippy::result_large_err)]
pub(super) fn load_config(config_toml: &str) -> Result<Config> {
    Config::parse_toml(config_toml)
}

/// Open the configured store. Callers close it when done.
#[allow(clippy::result_large_err)]
pub(super) fn open_store(config: &Config) -> Result<Arc<CacheStore>> {
    let store = Arc::new(CacheStore::new(
        config.store.to_options(),
        Arc::new(SystemClock),
    ));
    store.open()?;
    Ok(store)
}
