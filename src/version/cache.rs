//! In-memory cache with per-entry expiration
//!
//! Entries carry an absolute deadline computed at insertion time. Expired
//! entries are evicted lazily by the read that discovers them.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe key/value store whose entries expire after a fixed TTL
///
/// Lookups share a read lock. Inserts and the eviction performed by
/// [`TtlCache::get`] take the write lock.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the value for `key` if it has not expired
    ///
    /// An expired entry is removed before returning `None`.
    pub fn get(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.is_live(Instant::now()) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have replaced the entry between the two locks.
        match entries.get(key) {
            Some(entry) if entry.is_live(Instant::now()) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                debug!("Evicted expired cache entry");
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key`, replacing any previous entry
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }

    /// Whether an entry is stored for `key`, expired or not
    pub fn contains_entry(&self, key: &K) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn expire_now(&self, key: &K) {
        if let Some(entry) = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(key)
        {
            entry.expires_at = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn hour_cache() -> TtlCache<String, String> {
        TtlCache::new(Duration::from_secs(3600))
    }

    #[test]
    fn get_returns_value_right_after_insert() {
        let cache = hour_cache();

        cache.insert("release:actions/checkout".to_string(), "v4.1.0".to_string());

        assert_eq!(
            cache.get(&"release:actions/checkout".to_string()),
            Some("v4.1.0".to_string())
        );
    }

    #[test]
    fn get_returns_none_for_unknown_key() {
        let cache = hour_cache();

        assert_eq!(cache.get(&"release:unknown/repo".to_string()), None);
    }

    #[test]
    fn insert_overwrites_existing_value() {
        let cache = hour_cache();
        let key = "tags:actions/cache".to_string();

        cache.insert(key.clone(), "v3.0.0".to_string());
        cache.insert(key.clone(), "v4.0.0".to_string());

        assert_eq!(cache.get(&key), Some("v4.0.0".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_evicts_backdated_entry() {
        let cache = hour_cache();
        let key = "release:actions/checkout".to_string();
        cache.insert(key.clone(), "v4.1.0".to_string());

        cache.expire_now(&key);

        assert_eq!(cache.get(&key), None);
        assert!(!cache.contains_entry(&key));
        assert!(cache.is_empty());
    }

    #[test]
    fn get_evicts_entry_after_ttl_elapses() {
        let cache: TtlCache<String, String> = TtlCache::new(Duration::from_millis(10));
        let key = "release:actions/setup-go".to_string();
        cache.insert(key.clone(), "v5.0.0".to_string());

        thread::sleep(Duration::from_millis(30));

        assert!(cache.contains_entry(&key));
        assert_eq!(cache.get(&key), None);
        assert!(!cache.contains_entry(&key));
    }

    #[test]
    fn zero_ttl_never_serves_entries() {
        let cache: TtlCache<String, String> = TtlCache::new(Duration::ZERO);
        let key = "release:actions/checkout".to_string();

        cache.insert(key.clone(), "v4.1.0".to_string());

        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn concurrent_readers_and_writers_see_consistent_values() {
        let cache = Arc::new(TtlCache::<usize, usize>::new(Duration::from_secs(60)));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..200 {
                        let key = i % 16;
                        if worker % 2 == 0 {
                            cache.insert(key, key * 10);
                        } else if let Some(value) = cache.get(&key) {
                            assert_eq!(value, key * 10);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 16);
    }
}
