//! Mushaf Search - diacritic-insensitive verse search
//!
//! Builds an in-memory index over a static corpus once per process and
//! answers substring queries in corpus order.

pub mod normalize;
pub mod corpus;
pub mod pages;
pub mod index;
pub mod snippet;
pub mod cache;
pub mod search;
pub mod session;
pub mod config;
pub mod error;
pub mod state;

pub use error::MushafError;
pub use state::AppState;
pub use config::{CorpusFormat, SearchConfig};
pub use normalize::{normalize_arabic, normalize_with_offsets};
pub use corpus::{CorpusEntry, CorpusSource, CorpusUnit, JsonDirCorpus, SqliteCorpus, StaticCorpus};
pub use pages::{PageLocator, PageStart, PageTable};
pub use index::{IndexedRecord, SearchHit, SearchIndex, DEFAULT_LIMIT, MAX_LIMIT, MIN_QUERY_CHARS};
pub use snippet::{snippet, Snippet};
pub use cache::{QueryCache, QueryKey};
pub use search::{SearchResult, SearchResults, SearchService};
pub use session::{SearchSession, SessionResult, DEFAULT_DEBOUNCE};
