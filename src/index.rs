//! In-memory verse index with build-once semantics
//!
//! The index is built at most once per instance. The first caller of
//! [`SearchIndex::build_once`] (or of a query on a cold index) spawns a build
//! task that runs the corpus load on the blocking pool; every caller, early or
//! late, awaits that same task. Records are published only once the whole
//! corpus has been processed.
//!
//! Queries are a linear scan over normalized text in corpus order. There is
//! no inverted index; query cost grows with corpus size.

use crate::corpus::CorpusSource;
use crate::normalize::normalize_arabic;
use crate::pages::PageLocator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Default number of hits returned per query
pub const DEFAULT_LIMIT: usize = 50;

/// Largest limit consumers should ask for
pub const MAX_LIMIT: usize = 200;

/// Normalized queries shorter than this (in chars) never match
pub const MIN_QUERY_CHARS: usize = 2;

/// A single query result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub chapter_id: u32,
    pub sequence_id: u32,
    pub text: String,
    pub chapter_title: String,
    pub page: u32,
}

#[derive(Debug, Clone)]
pub struct IndexedRecord {
    hit: SearchHit,
    normalized: String,
}

impl IndexedRecord {
    pub fn hit(&self) -> &SearchHit {
        &self.hit
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

#[derive(Debug)]
struct BuiltIndex {
    records: Vec<IndexedRecord>,
    built_at: DateTime<Utc>,
}

impl BuiltIndex {
    fn new(records: Vec<IndexedRecord>) -> Self {
        Self {
            records,
            built_at: Utc::now(),
        }
    }

    fn scan(&self, normalized_query: &str, limit: usize) -> Vec<SearchHit> {
        self.records
            .iter()
            .filter(|record| record.normalized.contains(normalized_query))
            .take(limit)
            .map(|record| record.hit.clone())
            .collect()
    }
}

type BuildSlot = watch::Receiver<Option<Arc<BuiltIndex>>>;

pub struct SearchIndex {
    source: Arc<dyn CorpusSource>,
    pages: Arc<dyn PageLocator>,
    /// Set on the first build request; the build task owns the sender
    build: OnceLock<BuildSlot>,
    published: OnceLock<Arc<BuiltIndex>>,
}

impl SearchIndex {
    pub fn new(source: Arc<dyn CorpusSource>, pages: Arc<dyn PageLocator>) -> Self {
        Self {
            source,
            pages,
            build: OnceLock::new(),
            published: OnceLock::new(),
        }
    }

    /// Build the index if it has not been built yet.
    ///
    /// Never fails: a corpus that cannot be loaded produces an empty index.
    /// The build runs in its own task, so dropping this future does not
    /// abort or restart it. Must be called from within a tokio runtime.
    pub async fn build_once(&self) {
        self.built().await;
    }

    fn start_build(&self) -> &BuildSlot {
        self.build.get_or_init(|| {
            let (tx, rx) = watch::channel(None);
            let source = Arc::clone(&self.source);
            let pages = Arc::clone(&self.pages);

            tokio::spawn(async move {
                let start = Instant::now();
                let records = tokio::task::spawn_blocking(move || {
                    build_records(source.as_ref(), pages.as_ref())
                })
                .await
                .unwrap_or_else(|e| {
                    warn!("Index build task failed, using empty corpus: {}", e);
                    Vec::new()
                });

                info!(
                    records = records.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Search index built"
                );

                tx.send_replace(Some(Arc::new(BuiltIndex::new(records))));
            });

            rx
        })
    }

    async fn built(&self) -> &Arc<BuiltIndex> {
        if let Some(built) = self.published() {
            return built;
        }

        let mut rx = self.start_build().clone();
        let built = rx
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|slot| slot.as_ref().cloned())
            .unwrap_or_else(|| {
                warn!("Index build task ended without a result, using empty corpus");
                Arc::new(BuiltIndex::new(Vec::new()))
            });

        self.published.get_or_init(|| built)
    }

    /// The finished index, if the build task has completed
    fn published(&self) -> Option<&Arc<BuiltIndex>> {
        if let Some(built) = self.published.get() {
            return Some(built);
        }
        let built = self.build.get()?.borrow().as_ref().cloned()?;
        Some(self.published.get_or_init(|| built))
    }

    /// Find up to `limit` verses whose normalized text contains the
    /// normalized query, in corpus order. Builds the index first if needed.
    pub async fn query(&self, text: &str, limit: usize) -> Vec<SearchHit> {
        let Some(normalized) = searchable_query(text, limit) else {
            return Vec::new();
        };
        self.built().await.scan(&normalized, limit)
    }

    /// Synchronous query against an already built index; `None` while unbuilt
    pub fn try_query(&self, text: &str, limit: usize) -> Option<Vec<SearchHit>> {
        let built = self.published()?;
        Some(match searchable_query(text, limit) {
            Some(normalized) => built.scan(&normalized, limit),
            None => Vec::new(),
        })
    }

    pub fn is_built(&self) -> bool {
        self.published().is_some()
    }

    /// Number of indexed records, 0 while unbuilt
    pub fn len(&self) -> usize {
        self.published().map_or(0, |b| b.records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.published().map(|b| b.built_at)
    }

    /// Indexed records in corpus order, empty while unbuilt
    pub fn records(&self) -> &[IndexedRecord] {
        self.published()
            .map(|b| b.records.as_slice())
            .unwrap_or_default()
    }
}

/// Normalized query if it is long enough to search for
fn searchable_query(text: &str, limit: usize) -> Option<String> {
    if limit == 0 {
        return None;
    }
    let normalized = normalize_arabic(text);
    (normalized.chars().count() >= MIN_QUERY_CHARS).then_some(normalized)
}

fn build_records(source: &dyn CorpusSource, pages: &dyn PageLocator) -> Vec<IndexedRecord> {
    let units = match source.load() {
        Ok(units) => units,
        Err(e) => {
            warn!("Failed to load corpus, index will be empty: {:#}", e);
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for unit in &units {
        let title = unit.display_title();

        for (sequence, entry) in unit.numbered_entries() {
            let text = entry.text.trim();
            if text.is_empty() {
                continue;
            }

            let Some(page) = pages.page_for(unit.chapter, sequence) else {
                debug!(chapter = unit.chapter, sequence, "No page for verse, skipping");
                continue;
            };

            let normalized = normalize_arabic(text);
            if normalized.is_empty() {
                continue;
            }

            records.push(IndexedRecord {
                hit: SearchHit {
                    chapter_id: unit.chapter,
                    sequence_id: sequence,
                    text: text.to_string(),
                    chapter_title: title.clone(),
                    page,
                },
                normalized,
            });
        }
    }

    records
}
