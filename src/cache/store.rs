use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::metrics::MetricsRecorder;

use super::CacheConfig;

/// Sentinel for "no slot" in the intrusive recency list.
const NIL: usize = usize::MAX;

/// A stored value together with its expiry instant and recency-list links.
struct CacheEntry<V> {
    key: String,
    value: V,
    expires_at: Instant,
    prev: usize,
    next: usize,
}

/// Slab-backed LRU index: entries live in `slots`, the doubly linked list
/// threaded through `prev`/`next` orders them most- to least-recently used.
/// Every list operation is O(1); only the throttled expiry sweep scans.
struct LruStore<V> {
    slots: Vec<Option<CacheEntry<V>>>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
    head: usize,
    tail: usize,
    last_sweep: Instant,
}

impl<V> LruStore<V> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: NIL,
            tail: NIL,
            last_sweep: Instant::now(),
        }
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let entry = self.slots[idx].as_ref().expect("detached slot is live");
            (entry.prev, entry.next)
        };

        match prev {
            NIL => self.head = next,
            p => self.slots[p].as_mut().expect("prev slot is live").next = next,
        }
        match next {
            NIL => self.tail = prev,
            n => self.slots[n].as_mut().expect("next slot is live").prev = prev,
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let entry = self.slots[idx].as_mut().expect("pushed slot is live");
            entry.prev = NIL;
            entry.next = old_head;
        }
        if old_head != NIL {
            self.slots[old_head].as_mut().expect("head slot is live").prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn remove_slot(&mut self, idx: usize) -> CacheEntry<V> {
        self.detach(idx);
        let entry = self.slots[idx].take().expect("removed slot is live");
        self.index.remove(&entry.key);
        self.free.push(idx);
        entry
    }

    fn insert_front(&mut self, entry: CacheEntry<V>) {
        let key = entry.key.clone();
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.push_front(idx);
        self.index.insert(key, idx);
    }

    /// Removes every expired entry. Only called behind the sweep throttle.
    fn sweep_expired(&mut self, now: Instant) {
        let expired: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                slot.as_ref()
                    .filter(|entry| entry.expires_at <= now)
                    .map(|_| idx)
            })
            .collect();

        for idx in expired {
            self.remove_slot(idx);
        }
    }
}

/// Bounded TTL + LRU cache for search results.
///
/// All reads and writes run under a single short-lived lock; no I/O is
/// performed while it is held. Hits and misses are counted through the
/// shared [`MetricsRecorder`].
pub struct SearchCache<V> {
    config: CacheConfig,
    metrics: Arc<MetricsRecorder>,
    inner: Mutex<LruStore<V>>,
}

impl<V: Clone> SearchCache<V> {
    pub fn new(config: CacheConfig, metrics: Arc<MetricsRecorder>) -> Self {
        assert!(config.max_entries > 0, "cache capacity must be at least 1");
        Self {
            config,
            metrics,
            inner: Mutex::new(LruStore::new()),
        }
    }

    pub fn with_defaults(metrics: Arc<MetricsRecorder>) -> Self {
        Self::new(CacheConfig::default(), metrics)
    }

    /// Looks up `key`, refreshing its recency on a hit.
    ///
    /// An entry past its expiry instant is deleted and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut store = self.inner.lock();
        self.maybe_sweep(&mut store, now);

        let Some(&idx) = store.index.get(key) else {
            self.metrics.record_cache_miss();
            return None;
        };

        let expired = store.slots[idx]
            .as_ref()
            .expect("indexed slot is live")
            .expires_at
            <= now;
        if expired {
            store.remove_slot(idx);
            self.metrics.record_cache_miss();
            return None;
        }

        store.detach(idx);
        store.push_front(idx);
        self.metrics.record_cache_hit();
        Some(
            store.slots[idx]
                .as_ref()
                .expect("indexed slot is live")
                .value
                .clone(),
        )
    }

    /// Inserts `value` under `key`, evicting least-recently-used entries
    /// while the store is at capacity. The new entry becomes most recent.
    pub fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        let now = Instant::now();
        let expires_at = now + ttl.unwrap_or(self.config.default_ttl);

        let mut store = self.inner.lock();
        self.maybe_sweep(&mut store, now);

        if let Some(&idx) = store.index.get(key) {
            store.detach(idx);
            store.push_front(idx);
            let entry = store.slots[idx].as_mut().expect("indexed slot is live");
            entry.value = value;
            entry.expires_at = expires_at;
            return;
        }

        while store.index.len() >= self.config.max_entries {
            let tail = store.tail;
            if tail == NIL {
                break;
            }
            store.remove_slot(tail);
        }

        store.insert_front(CacheEntry {
            key: key.to_string(),
            value,
            expires_at,
            prev: NIL,
            next: NIL,
        });
    }

    /// Removes `key`, returning whether an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        let mut store = self.inner.lock();
        match store.index.get(key) {
            Some(&idx) => {
                store.remove_slot(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        let mut store = self.inner.lock();
        store.slots.clear();
        store.free.clear();
        store.index.clear();
        store.head = NIL;
        store.tail = NIL;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn maybe_sweep(&self, store: &mut LruStore<V>, now: Instant) {
        if now.duration_since(store.last_sweep) < self.config.sweep_interval {
            return;
        }
        store.last_sweep = now;
        store.sweep_expired(now);
    }
}

impl<V> std::fmt::Debug for SearchCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCache")
            .field("entries", &self.inner.lock().index.len())
            .field("max_entries", &self.config.max_entries)
            .finish()
    }
}
