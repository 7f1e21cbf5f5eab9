//! Search service: index + result cache + snippets

use crate::cache::{QueryCache, QueryKey};
use crate::index::{SearchHit, SearchIndex};
use crate::normalize::normalize_arabic;
use crate::snippet::{snippet, Snippet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub hit: SearchHit,
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub limit: usize,
    /// Number of results returned, at most `limit`
    pub total_hits: usize,
    /// Results filled the limit; more may be found with a larger one
    pub limit_reached: bool,
    pub results: Vec<SearchResult>,
    pub elapsed_ms: u64,
}

pub struct SearchService {
    index: Arc<SearchIndex>,
    cache: QueryCache,
}

impl SearchService {
    pub fn new(index: Arc<SearchIndex>, cache_capacity: usize) -> Self {
        Self {
            index,
            cache: QueryCache::new(cache_capacity),
        }
    }

    pub fn index(&self) -> &Arc<SearchIndex> {
        &self.index
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn search(&self, query: &str, limit: usize) -> SearchResults {
        let start = Instant::now();
        let hits = self.hits(query, limit).await;

        let results: Vec<SearchResult> = hits
            .iter()
            .map(|hit| SearchResult {
                snippet: snippet(&hit.text, query),
                hit: hit.clone(),
            })
            .collect();

        SearchResults {
            query: query.to_string(),
            limit,
            total_hits: results.len(),
            limit_reached: limit > 0 && results.len() >= limit,
            results,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn hits(&self, query: &str, limit: usize) -> Arc<Vec<SearchHit>> {
        let key = QueryKey::new(normalize_arabic(query), limit);
        if let Some(hits) = self.cache.get(&key) {
            return hits;
        }

        let hits = Arc::new(self.index.query(query, limit).await);
        // Too-short queries return before any build
        if self.index.is_built() {
            self.cache.put(key, Arc::clone(&hits));
        }
        hits
    }
}
