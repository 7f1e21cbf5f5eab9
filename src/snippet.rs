//! Display snippets around the first match of a query

use crate::normalize::{normalize_arabic, normalize_with_offsets};
use serde::{Deserialize, Serialize};

const CONTEXT_BEFORE: usize = 32;
const CONTEXT_AFTER: usize = 48;
const FALLBACK_CHARS: usize = 120;
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    /// Char range of the match within `text`
    pub highlight: Option<(usize, usize)>,
}

/// Cut a window of `text` around the first diacritic-insensitive match of
/// `query`, or the head of `text` if nothing matches.
pub fn snippet(text: &str, query: &str) -> Snippet {
    let chars: Vec<char> = text.trim().chars().collect();
    let needle = normalize_arabic(query);

    let Some((match_start, match_end)) = locate(&chars, &needle) else {
        return Snippet {
            text: chars.iter().take(FALLBACK_CHARS).collect(),
            highlight: None,
        };
    };

    let start = match_start.saturating_sub(CONTEXT_BEFORE);
    let end = (match_end + CONTEXT_AFTER).min(chars.len());

    let mut out = String::new();
    let mut offset = 0;
    if start > 0 {
        out.push(ELLIPSIS);
        offset = 1;
    }
    out.extend(&chars[start..end]);
    if end < chars.len() {
        out.push(ELLIPSIS);
    }

    Snippet {
        text: out,
        highlight: Some((match_start - start + offset, match_end - start + offset)),
    }
}

/// Char range in `chars` covered by the first match of the normalized needle
fn locate(chars: &[char], needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }

    let source: String = chars.iter().collect();
    let (haystack, offsets) = normalize_with_offsets(&source);
    let byte_pos = haystack.find(needle)?;

    let first = haystack[..byte_pos].chars().count();
    let last = first + needle.chars().count() - 1;

    let start = offsets[first];
    // Extend past marks trailing the last matched letter
    let mut end = offsets[last] + 1;
    while end < chars.len() && normalize_arabic(&chars[end].to_string()).is_empty()
        && !chars[end].is_whitespace()
    {
        end += 1;
    }

    Some((start, end))
}
