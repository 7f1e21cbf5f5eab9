//! Corpus types and loaders
//!
//! A corpus is an ordered list of chapters, each holding ordered verse
//! entries. Loaders are plain synchronous readers; the index runs them on the
//! blocking pool.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    /// Intra-chapter number; `None` means "position + 1"
    pub number: Option<u32>,
    pub text: String,
}

impl CorpusEntry {
    pub fn new(number: Option<u32>, text: impl Into<String>) -> Self {
        Self { number, text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusUnit {
    pub chapter: u32,
    pub title: Option<String>,
    pub entries: Vec<CorpusEntry>,
}

impl CorpusUnit {
    pub fn new(chapter: u32, title: Option<String>, entries: Vec<CorpusEntry>) -> Self {
        Self { chapter, title, entries }
    }

    /// Build a unit from bare texts, numbered from 1
    pub fn from_texts<S: Into<String>>(chapter: u32, title: Option<String>, texts: Vec<S>) -> Self {
        let entries = texts.into_iter().map(|t| CorpusEntry::new(None, t)).collect();
        Self { chapter, title, entries }
    }

    /// Chapter title, falling back to a generated placeholder
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("سورة {}", self.chapter),
        }
    }

    /// Entries paired with their resolved sequence number
    pub fn numbered_entries(&self) -> impl Iterator<Item = (u32, &CorpusEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.number.unwrap_or(idx as u32 + 1), entry))
    }
}

/// Supplies the ordered corpus at build time.
///
/// Must return units in the same order on every call within a process.
pub trait CorpusSource: Send + Sync {
    fn load(&self) -> Result<Vec<CorpusUnit>>;
}

/// Corpus held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    units: Vec<CorpusUnit>,
}

impl StaticCorpus {
    pub fn new(units: Vec<CorpusUnit>) -> Self {
        Self { units }
    }
}

impl CorpusSource for StaticCorpus {
    fn load(&self) -> Result<Vec<CorpusUnit>> {
        Ok(self.units.clone())
    }
}

/// Directory of per-chapter JSON files named by chapter number (`001.json`)
#[derive(Debug, Clone)]
pub struct JsonDirCorpus {
    dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ChapterFile {
    #[serde(default)]
    surah: Value,
    #[serde(default)]
    ayahs: Value,
}

impl JsonDirCorpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn chapter_files(&self) -> Result<Vec<(u32, PathBuf)>> {
        let mut files: Vec<(u32, PathBuf)> = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read corpus directory {:?}", self.dir))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                let chapter = path.file_stem()?.to_str()?.parse::<u32>().ok()?;
                Some((chapter, path))
            })
            .collect();

        files.sort_by_key(|(chapter, _)| *chapter);
        Ok(files)
    }
}

/// Parse one chapter file; a missing or non-array `ayahs` yields no entries
pub fn parse_chapter_json(chapter: u32, content: &str) -> Result<CorpusUnit> {
    let file: ChapterFile = serde_json::from_str(content)
        .with_context(|| format!("Invalid JSON for chapter {}", chapter))?;

    let entries = match file.ayahs {
        Value::Array(items) => items.iter().map(entry_from_value).collect(),
        _ => Vec::new(),
    };

    Ok(CorpusUnit::new(chapter, scalar_text(&file.surah), entries))
}

/// Strings as-is, numbers stringified, anything else absent
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn entry_from_value(value: &Value) -> CorpusEntry {
    let number = value
        .get("ayah_number")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok());

    let text = value.get("text").and_then(scalar_text).unwrap_or_default();

    CorpusEntry { number, text }
}

impl CorpusSource for JsonDirCorpus {
    fn load(&self) -> Result<Vec<CorpusUnit>> {
        self.chapter_files()?
            .into_iter()
            .map(|(chapter, path)| {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {:?}", path))?;
                parse_chapter_json(chapter, &content)
            })
            .collect()
    }
}

/// SQLite corpus with `chapters(number, title)` and `verses(chapter, number, text)`
#[derive(Debug, Clone)]
pub struct SqliteCorpus {
    db_path: PathBuf,
}

impl SqliteCorpus {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self { db_path: db_path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

impl CorpusSource for SqliteCorpus {
    fn load(&self) -> Result<Vec<CorpusUnit>> {
        let conn = Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open corpus.db at {:?}", self.db_path))?;

        let mut units: Vec<CorpusUnit> = conn
            .prepare("SELECT number, title FROM chapters ORDER BY number")?
            .query_map([], |row| {
                Ok(CorpusUnit::new(row.get(0)?, row.get(1)?, Vec::new()))
            })?
            .filter_map(|r| r.ok())
            .collect();

        let mut stmt = conn.prepare(
            "SELECT chapter, number, text FROM verses ORDER BY chapter, number",
        )?;
        let verses = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, Option<u32>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .filter_map(|r| r.ok());

        for (chapter, number, text) in verses {
            let entry = CorpusEntry::new(number, text.unwrap_or_default());
            match units.binary_search_by_key(&chapter, |u| u.chapter) {
                Ok(pos) => units[pos].entries.push(entry),
                // Verses without a chapters row still get indexed under a placeholder title
                Err(pos) => units.insert(pos, CorpusUnit::new(chapter, None, vec![entry])),
            }
        }

        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_entries_default_to_position() {
        let unit = CorpusUnit::new(
            2,
            None,
            vec![
                CorpusEntry::new(None, "a"),
                CorpusEntry::new(Some(7), "b"),
                CorpusEntry::new(None, "c"),
            ],
        );
        let numbers: Vec<u32> = unit.numbered_entries().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 7, 3]);
    }

    #[test]
    fn test_display_title_placeholder() {
        assert_eq!(CorpusUnit::new(3, None, vec![]).display_title(), "سورة 3");
        assert_eq!(CorpusUnit::new(3, Some("  ".into()), vec![]).display_title(), "سورة 3");
        assert_eq!(
            CorpusUnit::new(1, Some("الفاتحة".into()), vec![]).display_title(),
            "الفاتحة"
        );
    }

    #[test]
    fn test_parse_chapter_json_lenient() {
        let unit = parse_chapter_json(
            1,
            r#"{"surah":"الفاتحة","ayahs":[{"ayah_number":1,"text":"بِسْمِ اللَّهِ"},{"text":"الْحَمْدُ"},{"ayah_number":3}]}"#,
        )
        .unwrap();
        assert_eq!(unit.title.as_deref(), Some("الفاتحة"));
        assert_eq!(unit.entries.len(), 3);
        assert_eq!(unit.entries[0].number, Some(1));
        assert_eq!(unit.entries[1].number, None);
        assert_eq!(unit.entries[2].text, "");

        let unit = parse_chapter_json(5, r#"{"ayahs":"oops"}"#).unwrap();
        assert!(unit.entries.is_empty());
        assert_eq!(unit.display_title(), "سورة 5");
    }

    #[test]
    fn test_non_string_surah_does_not_fail_chapter() {
        let unit = parse_chapter_json(2, r#"{"surah":2,"ayahs":[{"text":"الم"}]}"#).unwrap();
        assert_eq!(unit.title.as_deref(), Some("2"));

        let unit = parse_chapter_json(3, r#"{"surah":{"name":"x"},"ayahs":[]}"#).unwrap();
        assert_eq!(unit.title, None);
        assert_eq!(unit.display_title(), "سورة 3");
    }

    #[test]
    fn test_json_dir_survives_odd_chapter_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("001.json"),
            r#"{"surah":"الفاتحة","ayahs":[{"ayah_number":1,"text":"بسم الله"}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("002.json"),
            r#"{"surah":null,"ayahs":[{"ayah_number":1,"text":"الم"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("003.json"), r#"{"surah":[1],"ayahs":[{"text":"الم"}]}"#)
            .unwrap();

        let units = JsonDirCorpus::new(dir.path()).load().unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].display_title(), "الفاتحة");
        assert_eq!(units[1].display_title(), "سورة 2");
        assert_eq!(units[2].display_title(), "سورة 3");
    }

    #[test]
    fn test_json_dir_sorted_by_chapter() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("10.json"), r#"{"ayahs":[{"text":"ten"}]}"#).unwrap();
        fs::write(dir.path().join("002.json"), r#"{"ayahs":[{"text":"two"}]}"#).unwrap();
        fs::write(dir.path().join("notes.json"), r#"{}"#).unwrap();
        fs::write(dir.path().join("001.txt"), "ignored").unwrap();

        let units = JsonDirCorpus::new(dir.path()).load().unwrap();
        let chapters: Vec<u32> = units.iter().map(|u| u.chapter).collect();
        assert_eq!(chapters, vec![2, 10]);
    }

    #[test]
    fn test_json_dir_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonDirCorpus::new(dir.path().join("nope")).load().is_err());
    }

    #[test]
    fn test_sqlite_corpus_orders_verses() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("corpus.db");
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE chapters (number INTEGER PRIMARY KEY, title TEXT);
            CREATE TABLE verses (chapter INTEGER NOT NULL, number INTEGER, text TEXT);
            INSERT INTO chapters VALUES (1, 'الفاتحة'), (2, NULL);
            INSERT INTO verses VALUES (2, 2, 'b2'), (1, 1, 'a1'), (2, 1, 'b1'), (3, 1, 'c1');
            "#,
        )
        .unwrap();
        drop(conn);

        let units = SqliteCorpus::new(&db_path).load().unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].display_title(), "الفاتحة");
        assert_eq!(units[1].display_title(), "سورة 2");
        let texts: Vec<&str> = units[1].entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["b1", "b2"]);
        assert_eq!(units[2].chapter, 3);
    }
}
