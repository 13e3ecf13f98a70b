use std::sync::Arc;
use std::time::Duration;

use crate::metrics::MetricsRecorder;

use super::{CacheConfig, SearchCache};

fn cache_with(config: CacheConfig) -> (SearchCache<i64>, Arc<MetricsRecorder>) {
    let metrics = Arc::new(MetricsRecorder::new());
    (SearchCache::new(config, Arc::clone(&metrics)), metrics)
}

#[test]
fn test_set_get_round_trip() {
    let (cache, _) = cache_with(CacheConfig::default());

    cache.set("k", 42, None);

    assert_eq!(cache.get("k"), Some(42));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_get_missing_key_is_miss() {
    let (cache, metrics) = cache_with(CacheConfig::default());

    assert_eq!(cache.get("absent"), None);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.cache_misses, 1);
    assert_eq!(snapshot.cache_hits, 0);
}

#[test]
fn test_entry_expires_after_ttl() {
    let (cache, _) = cache_with(CacheConfig::default());

    cache.set("k", 7, Some(Duration::from_millis(30)));
    assert_eq!(cache.get("k"), Some(7));

    std::thread::sleep(Duration::from_millis(60));

    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_lru_eviction_order() {
    let (cache, _) = cache_with(CacheConfig::default().max_entries(2));

    cache.set("a", 1, None);
    cache.set("b", 2, None);
    cache.set("c", 3, None);

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(2));
    assert_eq!(cache.get("c"), Some(3));
}

#[test]
fn test_get_promotes_entry() {
    let (cache, _) = cache_with(CacheConfig::default().max_entries(2));

    cache.set("a", 1, None);
    cache.set("b", 2, None);
    assert_eq!(cache.get("a"), Some(1));

    cache.set("c", 3, None);

    assert_eq!(cache.get("a"), Some(1));
    assert_eq!(cache.get("b"), None);
}

#[test]
fn test_set_existing_key_updates_in_place() {
    let (cache, _) = cache_with(CacheConfig::default().max_entries(2));

    cache.set("a", 1, None);
    cache.set("b", 2, None);
    cache.set("a", 10, None);

    assert_eq!(cache.len(), 2);

    // "a" was rewritten last, so "b" is now the LRU entry.
    cache.set("c", 3, None);
    assert_eq!(cache.get("a"), Some(10));
    assert_eq!(cache.get("b"), None);
}

#[test]
fn test_delete() {
    let (cache, _) = cache_with(CacheConfig::default());

    cache.set("k", 1, None);

    assert!(cache.delete("k"));
    assert!(!cache.delete("k"));
    assert_eq!(cache.get("k"), None);
}

#[test]
fn test_clear() {
    let (cache, _) = cache_with(CacheConfig::default());

    cache.set("a", 1, None);
    cache.set("b", 2, None);
    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.get("a"), None);
}

#[test]
fn test_lazy_sweep_removes_expired_entries() {
    // Zero sweep interval so every access sweeps.
    let (cache, _) = cache_with(CacheConfig::default().sweep_interval(Duration::ZERO));

    cache.set("short_a", 1, Some(Duration::from_millis(20)));
    cache.set("short_b", 2, Some(Duration::from_millis(20)));
    cache.set("long", 3, Some(Duration::from_secs(60)));
    assert_eq!(cache.len(), 3);

    std::thread::sleep(Duration::from_millis(50));

    // An access on an unrelated key triggers the sweep.
    cache.set("other", 4, None);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("long"), Some(3));
}

#[test]
fn test_sweep_is_throttled() {
    let (cache, _) = cache_with(CacheConfig::default().sweep_interval(Duration::from_secs(3600)));

    cache.set("short", 1, Some(Duration::from_millis(20)));
    std::thread::sleep(Duration::from_millis(50));

    // Sweep has not run (interval not elapsed), so the expired entry is
    // still resident until it is read...
    cache.set("other", 2, None);
    assert_eq!(cache.len(), 2);

    // ...at which point expiry detection on `get` removes it.
    assert_eq!(cache.get("short"), None);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_hit_miss_counters() {
    let (cache, metrics) = cache_with(CacheConfig::default());

    cache.set("k", 1, None);
    let _ = cache.get("k");
    let _ = cache.get("k");
    let _ = cache.get("absent");

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.cache_hits, 2);
    assert_eq!(snapshot.cache_misses, 1);
}

#[test]
fn test_eviction_reuses_slots() {
    let (cache, _) = cache_with(CacheConfig::default().max_entries(2));

    for i in 0..100 {
        cache.set(&format!("key_{i}"), i, None);
    }

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("key_99"), Some(99));
    assert_eq!(cache.get("key_98"), Some(98));
}

#[test]
fn test_concurrent_access_is_consistent() {
    let (cache, _) = cache_with(CacheConfig::default().max_entries(64));
    let cache = Arc::new(cache);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..200 {
                    let key = format!("key_{}", (t * 200 + i) % 32);
                    cache.set(&key, i, None);
                    let _ = cache.get(&key);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 64);
}
