//! Query result caching with LRU eviction
//!
//! Only results from a built index are cached. The index never changes after
//! it is built, so entries never go stale.

use crate::index::SearchHit;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct QueryKey {
    pub normalized: String,
    pub limit: usize,
}

impl QueryKey {
    pub fn new(normalized: impl Into<String>, limit: usize) -> Self {
        Self { normalized: normalized.into(), limit }
    }
}

pub struct QueryCache {
    cache: Mutex<LruCache<QueryKey, Arc<Vec<SearchHit>>>>,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(FALLBACK_CAPACITY);
        Self { cache: Mutex::new(LruCache::new(capacity)) }
    }

    pub fn get(&self, key: &QueryKey) -> Option<Arc<Vec<SearchHit>>> {
        let mut cache = self.cache.lock().ok()?;
        cache.get(key).map(Arc::clone)
    }

    pub fn put(&self, key: QueryKey, hits: Arc<Vec<SearchHit>>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, hits);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// (entries, capacity)
    pub fn stats(&self) -> (usize, usize) {
        match self.cache.lock() {
            Ok(cache) => (cache.len(), cache.cap().get()),
            Err(_) => (0, 0),
        }
    }
}
