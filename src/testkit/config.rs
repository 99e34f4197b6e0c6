//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.
//! Avoids each test module defining its own slightly-different defaults.

use std::path::Path;
use std::sync::Arc;

use crate::adapter::outbound::sqlite::{CacheStore, StoreOptions};
use crate::domain::ErrorCountPolicy;
use crate::infrastructure::config::settings::Config;

use super::clock::ManualClock;

/// Parse `toml` with no environment overrides.
pub fn config(toml: &str) -> Config {
    Config::parse_toml_with_env(toml, |_| None).expect("test config must parse")
}

/// Store options pointing at `cache.db` inside `dir`, with vacuuming disabled
/// so sweeps report deterministically.
pub fn store_options(dir: &Path) -> StoreOptions {
    StoreOptions {
        vacuum_probability: 0.0,
        ..StoreOptions::new(dir.join("cache.db").to_string_lossy())
    }
}

/// An open store in `dir` driven by a manual clock starting at `now`.
pub fn open_store(dir: &Path, now: i64) -> (Arc<CacheStore>, Arc<ManualClock>) {
    open_store_with_policy(dir, now, ErrorCountPolicy::default())
}

/// Like [`open_store`] with an explicit error-count policy.
pub fn open_store_with_policy(
    dir: &Path,
    now: i64,
    policy: ErrorCountPolicy,
) -> (Arc<CacheStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now));
    let options = StoreOptions {
        error_count_policy: policy,
        ..store_options(dir)
    };
    let store = Arc::new(CacheStore::new(options, clock.clone()));
    store.open().expect("test store must open");
    (store, clock)
}
