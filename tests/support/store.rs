use std::sync::Arc;

use routekeeper::adapter::outbound::sqlite::CacheStore;
use routekeeper::domain::ErrorCountPolicy;
use routekeeper::testkit::clock::ManualClock;
use routekeeper::testkit::config::open_store_with_policy;
use tempfile::TempDir;

/// An open cache store in a temporary directory, removed on drop.
pub struct TempStore {
    _dir: TempDir,
    pub store: Arc<CacheStore>,
    pub clock: Arc<ManualClock>,
}

impl TempStore {
    pub fn open(now: i64) -> Self {
        Self::with_policy(now, ErrorCountPolicy::default())
    }

    pub fn with_policy(now: i64, policy: ErrorCountPolicy) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let (store, clock) = open_store_with_policy(dir.path(), now, policy);
        Self {
            _dir: dir,
            store,
            clock,
        }
    }
}

impl Drop for TempStore {
    fn drop(&mut self) {
        self.store.close();
    }
}
