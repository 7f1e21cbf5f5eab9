//! Runtime configuration
//!
//! Read from an optional JSON file. Every field has a default so an empty
//! object (or no file at all) is a valid configuration.

use crate::error::MushafError;
use crate::index::{DEFAULT_LIMIT, MAX_LIMIT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CorpusFormat {
    /// Directory of per-chapter JSON files
    #[default]
    JsonDir,
    /// SQLite database with `chapters` and `verses` tables
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Overrides data directory discovery
    pub data_dir: Option<PathBuf>,
    pub corpus_format: CorpusFormat,
    /// Relative to the data directory unless absolute
    pub corpus_path: PathBuf,
    /// Relative to the data directory unless absolute
    pub page_table: PathBuf,
    pub bind_addr: String,
    pub default_limit: usize,
    pub max_limit: usize,
    pub cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            corpus_format: CorpusFormat::default(),
            corpus_path: PathBuf::from("quran"),
            page_table: PathBuf::from("mushaf-pages.json"),
            bind_addr: "127.0.0.1:3000".to_string(),
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            cache_capacity: 1000,
        }
    }
}

impl SearchConfig {
    /// Load config from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, MushafError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .map_err(|e| MushafError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, MushafError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| MushafError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), MushafError> {
        if self.max_limit == 0 {
            return Err(MushafError::Config("max_limit must be positive".to_string()));
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(MushafError::Config(format!(
                "default_limit must be between 1 and max_limit ({})",
                self.max_limit
            )));
        }
        Ok(())
    }

    /// Clamp a requested limit into `1..=max_limit`
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(get_data_dir)
    }

    pub fn corpus_location(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.corpus_path)
    }

    pub fn page_table_location(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.page_table)
    }
}

fn has_corpus(dir: &Path) -> bool {
    dir.join("quran").is_dir() || dir.join("corpus.db").exists()
}

/// Get the data directory
///
/// - Development: `data/` in the working directory or a parent of it
/// - Otherwise: `data/` next to the executable if it holds a corpus
/// - Fallback: the platform data directory
pub fn get_data_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        let dev_paths = [PathBuf::from("data"), PathBuf::from("../data")];
        for path in &dev_paths {
            if has_corpus(path) {
                return path.canonicalize().unwrap_or_else(|_| path.clone());
            }
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let data_path = exe_dir.join("data");
            if has_corpus(&data_path) {
                return data_path;
            }
        }
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("mushaf-search");
    }

    PathBuf::from("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(SearchConfig::from_json("{}").unwrap(), SearchConfig::default());
        assert_eq!(SearchConfig::load(None).unwrap(), SearchConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SearchConfig::from_json(
            r#"{"corpus_format": "sqlite", "corpus_path": "corpus.db", "default_limit": 20}"#,
        )
        .unwrap();
        assert_eq!(config.corpus_format, CorpusFormat::Sqlite);
        assert_eq!(config.corpus_path, PathBuf::from("corpus.db"));
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.max_limit, MAX_LIMIT);
    }

    #[test]
    fn test_invalid_limits_rejected() {
        assert!(SearchConfig::from_json(r#"{"max_limit": 0}"#).is_err());
        assert!(SearchConfig::from_json(r#"{"default_limit": 500}"#).is_err());
        assert!(SearchConfig::from_json(r#"{"corpus_format": "xml"}"#).is_err());
    }

    #[test]
    fn test_effective_limit() {
        let config = SearchConfig::default();
        assert_eq!(config.effective_limit(None), 50);
        assert_eq!(config.effective_limit(Some(0)), 1);
        assert_eq!(config.effective_limit(Some(120)), 120);
        assert_eq!(config.effective_limit(Some(10_000)), 200);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"bind_addr": "0.0.0.0:8080"}"#).unwrap();
        assert_eq!(SearchConfig::load(Some(&path)).unwrap().bind_addr, "0.0.0.0:8080");
        assert!(SearchConfig::load(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn test_locations_relative_to_data_dir() {
        let config = SearchConfig {
            data_dir: Some(PathBuf::from("/srv/mushaf")),
            ..SearchConfig::default()
        };
        let data_dir = config.resolve_data_dir();
        assert_eq!(data_dir, PathBuf::from("/srv/mushaf"));
        assert_eq!(config.corpus_location(&data_dir), PathBuf::from("/srv/mushaf/quran"));
        assert_eq!(
            config.page_table_location(&data_dir),
            PathBuf::from("/srv/mushaf/mushaf-pages.json")
        );
    }
}
