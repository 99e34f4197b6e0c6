//! Periodic cache store maintenance.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::adapter::outbound::sqlite::CacheStore;

/// Run [`CacheStore::cleanup`] every `period` until the task is aborted.
///
/// The first sweep happens one full period after spawning. A failed sweep is
/// logged and retried at the next tick.
pub fn spawn_maintenance(store: Arc<CacheStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        debug!(period_secs = period.as_secs(), "Maintenance task started");

        loop {
            interval.tick().await;
            if !store.is_open() {
                debug!("Store closed, stopping maintenance");
                return;
            }
            match store.cleanup().await {
                Ok(report) => info!(
                    removed = report.total_removed(),
                    vacuumed = report.vacuumed,
                    "Cache maintenance complete"
                ),
                Err(e) => warn!(error = %e, "Cache maintenance failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::StoreOptions;
    use crate::testkit::clock::ManualClock;

    #[tokio::test(start_paused = true)]
    async fn sweeps_on_each_period() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let path = dir.path().join("cache.db");
        let store = Arc::new(CacheStore::new(
            StoreOptions::new(path.to_string_lossy()),
            clock.clone(),
        ));
        store.open().unwrap();
        store.set("expiring", &"value", 10).await.unwrap();

        let handle = spawn_maintenance(Arc::clone(&store), Duration::from_secs(3600));
        clock.set(60);
        tokio::time::sleep(Duration::from_secs(3601)).await;
        tokio::task::yield_now().await;

        // Rewinding the clock would revive a row the sweep missed.
        clock.set(0);
        assert_eq!(store.get::<String>("expiring").await.unwrap(), None);
        handle.abort();
    }
}
