//! Thread-safe in-memory cache with a fixed time-to-live.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::port::Clock;

/// Upper bound on live entries held by one cache.
pub const DEFAULT_MAX_ENTRIES: usize = 100_000;

struct Entries<K, V> {
    map: HashMap<K, (V, i64)>,
    next_sweep: i64,
}

impl<K: Eq + Hash, V> Entries<K, V> {
    fn purge(&mut self, now: i64) -> usize {
        let before = self.map.len();
        self.map.retain(|_, (_, expires_at)| *expires_at > now);
        before - self.map.len()
    }
}

/// In-memory map whose entries expire `ttl_secs` after insertion.
///
/// Expired entries are never returned. They are dropped when a lookup touches
/// them, by a sweep that `insert` runs at most once per TTL period, or by
/// [`TtlCache::purge_expired`]. When the cache is full the entry closest to
/// expiry is evicted.
pub struct TtlCache<K, V> {
    entries: RwLock<Entries<K, V>>,
    ttl_secs: i64,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(Entries {
                map: HashMap::new(),
                next_sweep: i64::MIN,
            }),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
            max_entries: DEFAULT_MAX_ENTRIES,
            clock,
        }
    }

    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    #[must_use]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Get a live entry.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        {
            let entries = self.entries.read();
            match entries.map.get(key) {
                Some((value, expires_at)) if *expires_at > now => return Some(value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.entries.write().map.remove(key);
        None
    }

    /// Split `keys` into live hits and the keys that missed.
    ///
    /// Expired entries among `keys` are removed.
    #[must_use]
    pub fn get_many(&self, keys: &[K]) -> (Vec<V>, Vec<K>) {
        let now = self.clock.now();
        let mut hits = Vec::new();
        let mut misses = Vec::new();
        let mut expired = Vec::new();
        {
            let entries = self.entries.read();
            for key in keys {
                match entries.map.get(key) {
                    Some((value, expires_at)) if *expires_at > now => hits.push(value.clone()),
                    Some(_) => {
                        expired.push(key);
                        misses.push(key.clone());
                    }
                    None => misses.push(key.clone()),
                }
            }
        }
        if !expired.is_empty() {
            let mut entries = self.entries.write();
            for key in expired {
                if matches!(entries.map.get(key), Some((_, expires_at)) if *expires_at <= now) {
                    entries.map.remove(key);
                }
            }
        }
        (hits, misses)
    }

    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let expires_at = now.saturating_add(self.ttl_secs);
        let mut entries = self.entries.write();

        if now >= entries.next_sweep {
            entries.purge(now);
            entries.next_sweep = now.saturating_add(self.ttl_secs.max(1));
        }
        if entries.map.len() >= self.max_entries && !entries.map.contains_key(&key) {
            if entries.purge(now) == 0 {
                let oldest = entries
                    .map
                    .iter()
                    .min_by_key(|(_, (_, expires_at))| *expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.map.remove(&oldest);
                }
            }
        }
        entries.map.insert(key, (value, expires_at));
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        self.entries.write().purge(now)
    }

    /// Number of entries, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::clock::ManualClock;

    #[test]
    fn entries_expire_after_ttl() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = TtlCache::new(180, clock.clone());
        cache.insert("pool", 1);

        clock.set(179);
        assert_eq!(cache.get(&"pool"), Some(1));
        clock.set(180);
        assert_eq!(cache.get(&"pool"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn get_many_splits_hits_and_misses() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = TtlCache::new(10, clock);
        cache.insert(1, "a");
        cache.insert(3, "c");

        let (hits, misses) = cache.get_many(&[1, 2, 3]);
        assert_eq!(hits, vec!["a", "c"]);
        assert_eq!(misses, vec![2]);
    }

    #[test]
    fn purge_removes_only_expired() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = TtlCache::new(10, clock.clone());
        cache.insert(1, ());
        clock.set(5);
        cache.insert(2, ());
        clock.set(12);

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_many_drops_expired_keys() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = TtlCache::new(10, clock.clone());
        cache.insert(1, "a");
        clock.set(5);
        cache.insert(2, "b");
        clock.set(11);

        let (hits, misses) = cache.get_many(&[1, 2]);
        assert_eq!(hits, vec!["b"]);
        assert_eq!(misses, vec![1]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn inserts_sweep_entries_that_are_never_read_again() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = TtlCache::new(180, clock.clone());

        for block in 0..1000i64 {
            clock.set(block * 12);
            cache.insert(block, ());
        }

        // At most two TTL windows of 12 s blocks survive between sweeps.
        assert!(cache.len() <= 31, "held {} entries", cache.len());
        assert_eq!(cache.get(&999), Some(()));
    }

    #[test]
    fn full_cache_evicts_entry_closest_to_expiry() {
        let clock = Arc::new(ManualClock::new(0));
        let cache = TtlCache::new(100, clock.clone()).with_max_entries(2);
        cache.insert("a", 1);
        clock.set(1);
        cache.insert("b", 2);
        clock.set(2);
        cache.insert("c", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), Some(3));

        // Overwriting a present key never evicts.
        cache.insert("c", 4);
        assert_eq!(cache.get(&"b"), Some(2));
    }
}
