//! TTL cache of successful registry responses
//!
//! Entries are keyed by endpoint plus every request parameter except the
//! service key. Expired entries are dropped on lookup and swept on every
//! insert; there is no background refresh.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Full request signature used as the cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    endpoint: String,
    params: BTreeMap<String, String>,
}

impl CacheKey {
    pub fn new(endpoint: impl Into<String>, params: &BTreeMap<String, String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: params.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug)]
struct CacheEntry {
    body: Arc<str>,
    expires_at: Instant,
}

/// In-memory response cache with a fixed validity window
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached body if it is still valid
    pub fn get(&self, key: &CacheKey) -> Option<Arc<str>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Some(Arc::clone(&entry.body)),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores a body, replacing any previous entry for the key
    ///
    /// Every insert also sweeps out entries whose window has passed, so keys
    /// that are never looked up again do not accumulate.
    pub fn insert(&self, key: CacheKey, body: Arc<str>) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, entry| now < entry.expires_at);
        if self.ttl.is_zero() {
            return;
        }
        entries.insert(
            key,
            CacheEntry {
                body,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Number of entries held, including any expired since the last insert
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_hit_within_window() {
        let cache = ResponseCache::new(Duration::from_secs(3600));
        let key = CacheKey::new("areaBasedList1", &params(&[("pageNo", "1")]));
        cache.insert(key.clone(), Arc::from("{}"));

        assert_eq!(cache.get(&key).as_deref(), Some("{}"));
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = ResponseCache::new(Duration::from_millis(20));
        let key = CacheKey::new("areaBasedList1", &params(&[("pageNo", "1")]));
        cache.insert(key.clone(), Arc::from("{}"));
        assert_eq!(cache.len(), 1);
        std::thread::sleep(Duration::from_millis(40));

        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_sweeps_entries_never_looked_up_again() {
        let cache = ResponseCache::new(Duration::ZERO);
        for page in 1..=1000 {
            let page = page.to_string();
            let key = CacheKey::new("areaBasedList1", &params(&[("pageNo", page.as_str())]));
            cache.insert(key, Arc::from("{}"));
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_keeps_live_entries() {
        let cache = ResponseCache::new(Duration::from_millis(50));
        let stale = CacheKey::new("detailCommon1", &params(&[("contentId", "1")]));
        cache.insert(stale.clone(), Arc::from("stale"));
        std::thread::sleep(Duration::from_millis(80));

        let fresh = CacheKey::new("detailCommon1", &params(&[("contentId", "2")]));
        cache.insert(fresh.clone(), Arc::from("fresh"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&fresh).as_deref(), Some("fresh"));
        assert!(cache.get(&stale).is_none());
    }

    #[test]
    fn test_distinct_params_do_not_collide() {
        let cache = ResponseCache::new(Duration::from_secs(3600));
        let page_one = CacheKey::new("areaBasedList1", &params(&[("pageNo", "1")]));
        let page_two = CacheKey::new("areaBasedList1", &params(&[("pageNo", "2")]));
        let other_endpoint = CacheKey::new("searchKeyword1", &params(&[("pageNo", "1")]));

        cache.insert(page_one.clone(), Arc::from("one"));
        cache.insert(page_two.clone(), Arc::from("two"));

        assert_eq!(cache.get(&page_one).as_deref(), Some("one"));
        assert_eq!(cache.get(&page_two).as_deref(), Some("two"));
        assert!(cache.get(&other_endpoint).is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_param_order_is_irrelevant() {
        let a = CacheKey::new("x", &params(&[("a", "1"), ("b", "2")]));
        let b = CacheKey::new("x", &params(&[("b", "2"), ("a", "1")]));
        assert_eq!(a, b);
    }
}
