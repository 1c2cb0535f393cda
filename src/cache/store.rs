//! TTL-bounded LRU storage shared by every cache tier.
//!
//! Values are handed out as `Arc<V>`: within one epoch every reader of a key
//! receives the very same allocation, which is what keeps the metadata pass
//! and the body pass of a request looking at one snapshot.

use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use bytes::Bytes;
use lru::LruCache;
use metrics::counter;
use tracing::debug;

use super::keys::CacheTag;
use super::lock::{read_tier, write_tier};

pub(crate) const METRIC_CACHE_HIT: &str = "vizesayfa_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "vizesayfa_cache_miss_total";
pub(crate) const METRIC_CACHE_EVICT: &str = "vizesayfa_cache_evict_total";

/// Result of a loader run.
///
/// `cacheable = false` returns the value to the caller without storing it.
#[derive(Debug)]
pub struct Fresh<V> {
    pub value: V,
    pub cacheable: bool,
}

impl<V> Fresh<V> {
    pub fn cacheable(value: V) -> Self {
        Self {
            value,
            cacheable: true,
        }
    }

    pub fn transient(value: V) -> Self {
        Self {
            value,
            cacheable: false,
        }
    }
}

struct Entry<V> {
    value: Arc<V>,
    stored_at: Instant,
}

pub struct TtlStore<K, V> {
    tier: &'static str,
    tags: &'static [CacheTag],
    ttl: Duration,
    enabled: bool,
    entries: RwLock<LruCache<K, Entry<V>>>,
}

impl<K, V> TtlStore<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new(
        tier: &'static str,
        tags: &'static [CacheTag],
        ttl: Duration,
        capacity: NonZeroUsize,
        enabled: bool,
    ) -> Self {
        Self {
            tier,
            tags,
            ttl,
            enabled,
            entries: RwLock::new(LruCache::new(capacity)),
        }
    }

    pub fn tier(&self) -> &'static str {
        self.tier
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn carries(&self, tag: CacheTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Live entry for `key`; expired entries are dropped on the way.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        if !self.enabled {
            return None;
        }

        let mut entries = write_tier(&self.entries, self.tier, "get");
        let expired = match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                counter!(METRIC_CACHE_HIT, "tier" => self.tier).increment(1);
                return Some(Arc::clone(&entry.value));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            debug!(tier = self.tier, "cache entry expired");
        }
        counter!(METRIC_CACHE_MISS, "tier" => self.tier).increment(1);
        None
    }

    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        if !self.enabled {
            return value;
        }

        let entry = Entry {
            value: Arc::clone(&value),
            stored_at: Instant::now(),
        };
        let evicted = write_tier(&self.entries, self.tier, "insert").push(key.clone(), entry);
        if let Some((evicted_key, _)) = evicted
            && evicted_key != key
        {
            counter!(METRIC_CACHE_EVICT, "tier" => self.tier).increment(1);
        }
        value
    }

    /// Serve `key` from the tier, or run `loader` and store its result.
    ///
    /// Concurrent misses for one key may both run the loader; the last writer
    /// wins and both callers get a consistent value.
    pub async fn get_or_load<F, Fut>(&self, key: K, loader: F) -> Arc<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Fresh<V>>,
    {
        if let Some(hit) = self.get(&key) {
            return hit;
        }

        let fresh = loader().await;
        if fresh.cacheable {
            self.insert(key, fresh.value)
        } else {
            debug!(tier = self.tier, "loader result not cacheable; serving uncached");
            Arc::new(fresh.value)
        }
    }

    pub fn remove(&self, key: &K) {
        write_tier(&self.entries, self.tier, "remove").pop(key);
    }

    pub fn clear(&self) {
        write_tier(&self.entries, self.tier, "clear").clear();
    }

    pub fn len(&self) -> usize {
        read_tier(&self.entries, self.tier, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rendered response held by the outer tier.
#[derive(Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}
