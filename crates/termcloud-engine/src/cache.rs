//! Memoization cache for assembled word-cloud results.
//!
//! Keyed by the request's canonical digest. Entries expire lazily on read
//! after the TTL, and insertion evicts the oldest-inserted entry once the
//! cache is full — insertion order, not access recency: a `get` does not
//! refresh an entry's position. Callers always receive clones; the stored
//! payload is never aliased.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use termcloud_core::types::{WordCloudRequest, WordCloudResult};

struct CacheEntry {
    payload: WordCloudResult,
    dataset_ids: Vec<String>,
    inserted_at: Instant,
}

/// Thread-safe request cache with TTL and bounded size.
pub struct RequestCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Keys in insertion order; the front is evicted first.
    order: Vec<String>,
    max_size: usize,
    ttl: Duration,
}

impl RequestCache {
    /// Create a cache with the given capacity and TTL.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    /// Look up a memoized result. Returns a clone marked as a cache hit, or
    /// None on miss or expiry (expired entries are evicted on read).
    pub fn get(&self, request: &WordCloudRequest) -> Option<WordCloudResult> {
        let key = request.cache_key();
        let mut inner = self.inner.lock();

        let expired = inner
            .entries
            .get(&key)
            .map(|e| e.inserted_at.elapsed() >= inner.ttl)?;

        if expired {
            inner.entries.remove(&key);
            inner.order.retain(|k| k != &key);
            return None;
        }

        let mut payload = inner.entries[&key].payload.clone();
        payload.cache_hit = true;
        Some(payload)
    }

    /// Memoize a result. Evicts the oldest-inserted entry when at capacity.
    pub fn put(&self, request: &WordCloudRequest, result: WordCloudResult) {
        let key = request.cache_key();
        // Skipped datasets still scope invalidation: if data appears for one
        // later, entries that skipped it must not survive its invalidation.
        let dataset_ids = result
            .dataset_ids
            .iter()
            .chain(result.skipped_datasets.iter())
            .cloned()
            .collect();
        let entry = CacheEntry {
            payload: result,
            dataset_ids,
            inserted_at: Instant::now(),
        };

        let mut inner = self.inner.lock();

        if inner.entries.contains_key(&key) {
            // Re-insertion refreshes the timestamp and moves to the back.
            inner.entries.insert(key.clone(), entry);
            inner.order.retain(|k| k != &key);
            inner.order.push(key);
            return;
        }

        while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
            let oldest = inner.order.remove(0);
            inner.entries.remove(&oldest);
        }

        inner.order.push(key.clone());
        inner.entries.insert(key, entry);
    }

    /// Drop every entry referencing `dataset_id`, or everything when None.
    pub fn invalidate(&self, dataset_id: Option<&str>) {
        let mut inner = self.inner.lock();
        match dataset_id {
            Some(id) => {
                let doomed: Vec<String> = inner
                    .entries
                    .iter()
                    .filter(|(_, e)| e.dataset_ids.iter().any(|d| d == id))
                    .map(|(k, _)| k.clone())
                    .collect();
                for key in &doomed {
                    inner.entries.remove(key);
                }
                inner.order.retain(|k| !doomed.contains(k));
            }
            None => {
                inner.entries.clear();
                inner.order.clear();
            }
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcloud_core::types::AnalysisMode;

    fn request(id: &str) -> WordCloudRequest {
        WordCloudRequest::new([id], AnalysisMode::All)
    }

    fn result(id: &str) -> WordCloudResult {
        WordCloudResult::empty(vec![id.to_string()], AnalysisMode::All, "test")
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = RequestCache::new(10, Duration::from_secs(3600));
        let req = request("d1");
        assert!(cache.get(&req).is_none());

        cache.put(&req, result("d1"));
        let hit = cache.get(&req).unwrap();
        assert!(hit.cache_hit);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_is_insertion_ordered() {
        let cache = RequestCache::new(2, Duration::from_secs(3600));
        cache.put(&request("a"), result("a"));
        cache.put(&request("b"), result("b"));

        // Reading "a" does not protect it: eviction is insertion-ordered.
        assert!(cache.get(&request("a")).is_some());

        cache.put(&request("c"), result("c"));
        assert!(cache.get(&request("a")).is_none());
        assert!(cache.get(&request("b")).is_some());
        assert!(cache.get(&request("c")).is_some());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = RequestCache::new(10, Duration::from_millis(1));
        cache.put(&request("d1"), result("d1"));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&request("d1")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_by_dataset() {
        let cache = RequestCache::new(10, Duration::from_secs(3600));
        cache.put(&request("d1"), result("d1"));
        cache.put(&request("d2"), result("d2"));

        cache.invalidate(Some("d1"));
        assert!(cache.get(&request("d1")).is_none());
        assert!(cache.get(&request("d2")).is_some());
    }

    #[test]
    fn test_invalidate_all() {
        let cache = RequestCache::new(10, Duration::from_secs(3600));
        cache.put(&request("d1"), result("d1"));
        cache.put(&request("d2"), result("d2"));

        cache.invalidate(None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_multi_dataset_entry_invalidated_by_any_member() {
        let cache = RequestCache::new(10, Duration::from_secs(3600));
        let req = WordCloudRequest::new(["d1", "d2"], AnalysisMode::All);
        let mut res = result("d1");
        res.dataset_ids = vec!["d1".into(), "d2".into()];
        cache.put(&req, res);

        cache.invalidate(Some("d2"));
        assert!(cache.get(&req).is_none());
    }
}
