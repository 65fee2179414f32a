use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use sha2::{Digest, Sha256};

use crate::analysis::Finding;

/// Default freshness window for cached analysis results
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Default bound on distinct submissions kept in memory
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// Content-address a code submission.
///
/// The digest is taken over the exact bytes of the text. No trimming or
/// line-ending normalization may happen here: cache correctness depends on
/// any single-byte difference producing a different key.
pub fn content_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: Vec<Finding>,
    created_at: i64,
}

/// TTL-bounded map from content hash to a previously validated finding set.
///
/// Entries expire lazily: a stale entry is removed the first time a read
/// observes it, there is no background sweep. The map is additionally
/// capacity-bounded with least-recently-used eviction; the TTL freshness
/// contract is unaffected by the bound.
pub struct AnalysisCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl_secs: i64,
}

impl AnalysisCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self::with_capacity(ttl_secs, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(ttl_secs: i64, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).expect("capacity is at least one");
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl_secs,
        }
    }

    /// True iff an entry exists for `hash` and is within the TTL at `now`.
    /// Does not promote recency and does not evict.
    pub fn is_fresh(&self, hash: &str, now: i64) -> bool {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        entries
            .peek(hash)
            .map(|entry| now - entry.created_at <= self.ttl_secs)
            .unwrap_or(false)
    }

    /// Return the cached result if fresh; evict a stale entry on sight
    pub fn get(&self, hash: &str, now: i64) -> Option<Vec<Finding>> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");

        if let Some(entry) = entries.get(hash) {
            if now - entry.created_at <= self.ttl_secs {
                return Some(entry.result.clone());
            }
        } else {
            return None;
        }

        // Stale entry observed; this is the only place expiry happens
        entries.pop(hash);
        None
    }

    /// Unconditionally (re)insert, overwriting any prior entry. The
    /// least-recently-used entry is dropped if the cache is at capacity.
    pub fn put(&self, hash: String, result: Vec<Finding>, now: i64) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.put(
            hash,
            CacheEntry {
                result,
                created_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(line: u32, message: &str) -> Finding {
        Finding {
            line,
            message: message.to_string(),
            recommendation: "use a parameterized query".to_string(),
            severity: None,
            category: None,
            score: None,
            cwe: None,
        }
    }

    #[test]
    fn hash_is_deterministic_and_byte_sensitive() {
        let a = content_hash("SELECT * FROM users");
        let b = content_hash("SELECT * FROM users");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        // A trailing-whitespace difference must produce a different key
        let c = content_hash("SELECT * FROM users ");
        assert_ne!(a, c);
    }

    #[test]
    fn fresh_entry_is_returned() {
        let cache = AnalysisCache::new(3600);
        cache.put("k".to_string(), vec![finding(1, "hardcoded secret")], 1000);

        assert!(cache.is_fresh("k", 1000 + 3600));
        let hit = cache.get("k", 1000 + 3600).expect("entry within ttl");
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].line, 1);
    }

    #[test]
    fn stale_entry_is_evicted_on_read() {
        let cache = AnalysisCache::new(3600);
        cache.put("k".to_string(), vec![finding(1, "xss sink")], 1000);

        assert!(!cache.is_fresh("k", 1000 + 3601));
        assert!(cache.get("k", 1000 + 3601).is_none());
        // Lazy eviction removed the map entry itself
        assert!(cache.is_empty());
    }

    #[test]
    fn put_overwrites_prior_entry() {
        let cache = AnalysisCache::new(3600);
        cache.put("k".to_string(), vec![finding(1, "old")], 1000);
        cache.put("k".to_string(), vec![finding(2, "new")], 2000);

        let hit = cache.get("k", 2000).unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].message, "new");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_key_is_a_miss() {
        let cache = AnalysisCache::new(3600);
        assert!(!cache.is_fresh("absent", 0));
        assert!(cache.get("absent", 0).is_none());
    }

    #[test]
    fn capacity_bound_evicts_least_recently_used() {
        let cache = AnalysisCache::with_capacity(3600, 2);
        cache.put("a".to_string(), vec![finding(1, "first")], 1000);
        cache.put("b".to_string(), vec![finding(2, "second")], 1000);

        // Touch "a" so "b" becomes the eviction candidate
        assert!(cache.get("a", 1000).is_some());
        cache.put("c".to_string(), vec![finding(3, "third")], 1000);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a", 1000).is_some());
        assert!(cache.get("b", 1000).is_none());
        assert!(cache.get("c", 1000).is_some());
    }
}
