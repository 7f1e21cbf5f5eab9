//! Mushaf page lookup

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Resolves the mushaf page of a verse.
///
/// Returning `None` drops that single verse from the index.
pub trait PageLocator: Send + Sync {
    fn page_for(&self, chapter: u32, sequence: u32) -> Option<u32>;
}

impl<F> PageLocator for F
where
    F: Fn(u32, u32) -> Option<u32> + Send + Sync,
{
    fn page_for(&self, chapter: u32, sequence: u32) -> Option<u32> {
        self(chapter, sequence)
    }
}

/// First verse of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStart {
    pub page: u32,
    pub sura: u32,
    pub aya: u32,
}

/// Page-start table resolved by binary search
#[derive(Debug, Clone)]
pub struct PageTable {
    starts: Vec<PageStart>,
}

impl PageTable {
    pub fn new(mut starts: Vec<PageStart>) -> Result<Self> {
        if starts.is_empty() {
            return Err(anyhow!("Page table has no entries"));
        }
        starts.sort_by_key(|s| (s.sura, s.aya));
        Ok(Self { starts })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let starts: Vec<PageStart> =
            serde_json::from_str(content).context("Failed to parse page table")?;
        Self::new(starts)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read page table {:?}", path))?;
        Self::from_json(&content)
    }

    pub fn page_count(&self) -> u32 {
        self.starts.iter().map(|s| s.page).max().unwrap_or(0)
    }
}

impl PageLocator for PageTable {
    fn page_for(&self, chapter: u32, sequence: u32) -> Option<u32> {
        let key = (chapter, sequence);
        // Number of starts at or before `key`
        let after = self.starts.partition_point(|s| (s.sura, s.aya) <= key);
        after.checked_sub(1).map(|idx| self.starts[idx].page)
    }
}
