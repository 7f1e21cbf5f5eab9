//! Debounced search-as-you-type
//!
//! Each submission waits for the debounce delay and is dropped if a newer
//! submission arrives before its results are ready. The index itself has no
//! cancellation; a superseded query still runs to completion if it already
//! started scanning, its result is just discarded here.

use crate::index::{SearchHit, SearchIndex, MAX_LIMIT, MIN_QUERY_CHARS};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    Ready(Vec<SearchHit>),
    /// A newer submission replaced this one
    Superseded,
}

pub struct SearchSession {
    index: Arc<SearchIndex>,
    debounce: Duration,
    generation: AtomicU64,
}

impl SearchSession {
    pub fn new(index: Arc<SearchIndex>, debounce: Duration) -> Self {
        Self {
            index,
            debounce,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn submit(&self, text: &str, limit: usize) -> SessionResult {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if text.trim().chars().count() < MIN_QUERY_CHARS {
            return SessionResult::Ready(Vec::new());
        }

        tokio::time::sleep(self.debounce).await;
        if self.is_stale(generation) {
            return SessionResult::Superseded;
        }

        let hits = self.index.query(text, limit.min(MAX_LIMIT)).await;
        if self.is_stale(generation) {
            return SessionResult::Superseded;
        }

        SessionResult::Ready(hits)
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CorpusUnit, StaticCorpus};

    fn session(debounce: Duration) -> SearchSession {
        let units = (1..=300)
            .map(|n| CorpusUnit::from_texts(n, None, vec!["الحمد لله"]))
            .collect();
        let pages = |chapter: u32, _: u32| Some(chapter);
        let index = SearchIndex::new(Arc::new(StaticCorpus::new(units)), Arc::new(pages));
        SearchSession::new(Arc::new(index), debounce)
    }

    #[tokio::test]
    async fn test_latest_submission_wins() {
        let session = session(Duration::from_millis(30));
        let (first, second) = tokio::join!(session.submit("الحم", 10), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            session.submit("الحمد", 10).await
        });

        assert_eq!(first, SessionResult::Superseded);
        match second {
            SessionResult::Ready(hits) => assert_eq!(hits.len(), 10),
            other => panic!("expected results, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_short_query_resolves_immediately() {
        let session = session(Duration::from_secs(60));
        assert_eq!(session.submit(" ا ", 10).await, SessionResult::Ready(Vec::new()));
    }

    #[tokio::test]
    async fn test_limit_clamped() {
        let session = session(Duration::ZERO);
        match session.submit("لله", 1000).await {
            SessionResult::Ready(hits) => assert_eq!(hits.len(), MAX_LIMIT),
            other => panic!("expected results, got {:?}", other),
        }
    }
}
