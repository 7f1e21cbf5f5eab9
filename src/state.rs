//! Application state management

use crate::config::{CorpusFormat, SearchConfig};
use crate::corpus::{CorpusSource, JsonDirCorpus, SqliteCorpus};
use crate::error::MushafError;
use crate::index::SearchIndex;
use crate::pages::PageTable;
use crate::search::SearchService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Application state holding the search service and its configuration
pub struct AppState {
    pub search: Arc<SearchService>,
    pub config: SearchConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Wire corpus source and page table from the configured data directory.
    ///
    /// The corpus itself is not read here; it is loaded by the first build.
    pub fn new(config: SearchConfig) -> Result<Self, MushafError> {
        let data_dir = config.resolve_data_dir();

        let page_table_path = config.page_table_location(&data_dir);
        let pages = PageTable::load(&page_table_path)
            .map_err(|e| MushafError::PageTable(format!("{:#}", e)))?;

        let corpus_path = config.corpus_location(&data_dir);
        let source: Arc<dyn CorpusSource> = match config.corpus_format {
            CorpusFormat::JsonDir => Arc::new(JsonDirCorpus::new(&corpus_path)),
            CorpusFormat::Sqlite => Arc::new(SqliteCorpus::new(&corpus_path)),
        };

        info!(
            data_dir = %data_dir.display(),
            corpus = %corpus_path.display(),
            pages = pages.page_count(),
            "Search state initialized"
        );

        let index = Arc::new(SearchIndex::new(source, Arc::new(pages)));
        let search = Arc::new(SearchService::new(index, config.cache_capacity));

        Ok(Self {
            search,
            config,
            data_dir,
        })
    }

    /// Start building the index in the background
    pub fn spawn_index_build(&self) {
        let index = Arc::clone(self.search.index());
        tokio::spawn(async move {
            index.build_once().await;
        });
    }
}
