//! Caching utilities for detection results.

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: u64,
    pub capacity: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Bounded least-recently-used cache with statistics.
///
/// Values are cloned out under the lock, so callers never observe an
/// entry being evicted or replaced. A capacity of zero disables caching.
pub struct DetectionCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    inner: Option<Mutex<LruCache<K, V>>>,
    capacity: usize,
    name: String,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K, V> DetectionCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Create a new cache holding at most `capacity` entries.
    pub fn new(name: impl Into<String>, capacity: u64) -> Self {
        let capacity = usize::try_from(capacity).unwrap_or(usize::MAX);
        // Unbounded storage: the bound is enforced on insert so a large
        // capacity does not preallocate.
        let inner = (capacity > 0).then(|| Mutex::new(LruCache::unbounded()));

        Self {
            inner,
            capacity,
            name: name.into(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Get a value from the cache, marking it most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.inner.as_ref()?.lock().get(key).cloned();
        let counter = if value.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        value
    }

    /// Get a value without touching its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.as_ref()?.lock().peek(key).cloned()
    }

    /// Whether `key` is cached, without touching its recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.lock().contains(key))
    }

    /// Insert a value, evicting the least recently used entry when full.
    pub fn insert(&self, key: K, value: V) {
        let Some(inner) = &self.inner else {
            return;
        };

        let mut cache = inner.lock();
        if !cache.contains(&key) && cache.len() >= self.capacity && cache.pop_lru().is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        cache.put(key, value);
    }

    /// Return the cached value for `key`, computing and inserting it on a
    /// miss.
    ///
    /// `compute` runs without the lock held, so concurrent misses for the
    /// same key may each compute; the last insert wins.
    pub fn get_or_compute<Q>(&self, key: &Q, compute: impl FnOnce() -> V) -> V
    where
        K: Borrow<Q>,
        Q: ToOwned<Owned = K> + Hash + Eq + ?Sized,
    {
        if self.inner.is_none() {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return compute();
        }

        if let Some(value) = self.get(key) {
            return value;
        }

        debug!(cache = %self.name, "Cache miss");
        let value = compute();
        self.insert(key.to_owned(), value.clone());
        value
    }

    /// Get the current entry count.
    pub fn entry_count(&self) -> u64 {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.lock().len() as u64)
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> u64 {
        self.capacity as u64
    }

    /// Get the cache name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invalidate all entries.
    pub fn invalidate_all(&self) {
        if let Some(inner) = &self.inner {
            inner.lock().clear();
        }
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entry_count(),
            capacity: self.capacity(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
