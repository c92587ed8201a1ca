//! Bounded Cache Module
//!
//! Main cache engine combining HashMap storage with LRU eviction and TTL
//! expiration. Every operation is infallible: misses, expiry, and capacity
//! pressure are expressed through return values, never errors.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Bounded Cache ==
/// TTL+LRU key/value store with a hard entry capacity.
///
/// Values are cloned out on read. Callers choose sharing semantics by the
/// stored type: `Arc<T>` shares one allocation across all holders, a plain
/// `T` hands each reader an isolated snapshot.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied when set() is called without an explicit one
    default_ttl: Duration,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new BoundedCache with the given capacity and default TTL.
    ///
    /// A capacity of zero is bumped to one so the store can always hold the
    /// most recent insertion.
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(capacity),
            capacity,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// Expired entries are swept before insertion. If the key is new and the
    /// post-sweep cache is at capacity, entries with the oldest last-access
    /// time are evicted until there is room. Overwriting an existing key
    /// resets its TTL and never triggers eviction.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses the default TTL if None)
    pub fn set(&mut self, key: K, value: V, ttl: Option<Duration>) {
        self.sweep_expired();

        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite {
            while self.entries.len() >= self.capacity {
                match self.lru.evict_oldest() {
                    Some(evicted_key) => {
                        self.entries.remove(&evicted_key);
                        self.stats.record_eviction();
                    }
                    // Tracker and map always hold the same keys; an empty
                    // tracker means the map is empty too
                    None => break,
                }
            }
        }

        let effective_ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key.clone(), CacheEntry::new(value, effective_ttl));
        self.lru.touch(&key);

        self.stats.set_size(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if present and not expired. An expired entry is
    /// removed on the spot and counted as a miss. A successful read updates
    /// the entry's access statistics and its LRU position.
    pub fn get(&mut self, key: &K) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                self.lru.remove(key);
                self.stats.record_expired();
                self.stats.record_miss();
                self.stats.set_size(self.entries.len());
                return None;
            }
        } else {
            self.stats.record_miss();
            return None;
        }

        // Entry is present and live: update access bookkeeping, hand out a clone
        let value = self.entries.get_mut(key).map(|entry| {
            entry.touch();
            entry.value.clone()
        });
        self.stats.record_hit();
        self.lru.touch(key);
        value
    }

    // == Has ==
    /// Checks whether a live entry exists for the key.
    ///
    /// Applies the same expiry test as `get` but mutates nothing: no access
    /// statistics, no LRU movement, no removal of the expired entry.
    pub fn has(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    // == Delete ==
    /// Removes an entry by key, returning whether it was present.
    pub fn delete(&mut self, key: &K) -> bool {
        let was_present = self.entries.remove(key).is_some();
        if was_present {
            self.lru.remove(key);
            self.stats.set_size(self.entries.len());
        }
        was_present
    }

    // == Clear ==
    /// Removes all entries. Idempotent.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_size(0);
    }

    // == Invalidate Matching ==
    /// Removes every entry whose key satisfies the predicate.
    ///
    /// Used for cascading invalidation, e.g. dropping every cached analysis
    /// for one subject when its inputs change. Returns the number of entries
    /// removed.
    pub fn invalidate_matching<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&K) -> bool,
    {
        let matching_keys: Vec<K> = self
            .entries
            .keys()
            .filter(|key| predicate(key))
            .cloned()
            .collect();

        for key in &matching_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_size(self.entries.len());
        matching_keys.len()
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed. Called internally before every
    /// insertion and by the host's periodic sweep schedule.
    pub fn sweep_expired(&mut self) -> usize {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expired();
        }

        self.stats.set_size(self.entries.len());
        expired_keys.len()
    }

    // == Stats ==
    /// Returns a snapshot of current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
