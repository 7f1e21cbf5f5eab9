//! Arabic text normalization for substring matching
//!
//! Strips harakat and Quranic annotation marks, drops tatweel, folds alef,
//! alef maqsura and ta marbuta variants, then collapses whitespace.

const TATWEEL: char = '\u{0640}';

/// Combining marks removed before matching
#[inline]
fn is_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0610}'..='\u{061A}' | '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{06D6}'..='\u{06ED}'
    )
}

/// Map a single char to its canonical form, or `None` if it is dropped
#[inline]
fn fold(c: char) -> Option<char> {
    match c {
        _ if is_mark(c) => None,
        TATWEEL => None,
        'أ' | 'إ' | 'آ' | 'ٱ' => Some('ا'),
        'ى' => Some('ي'),
        'ة' => Some('ه'),
        _ => Some(c),
    }
}

/// Normalize Arabic text for search.
///
/// Total over its input: empty or non-Arabic text passes through with only
/// whitespace collapsed and trimmed.
pub fn normalize_arabic(text: &str) -> String {
    normalize_inner(text, None)
}

/// Like [`normalize_arabic`], also returning for each output char the index
/// of the input char it was produced from.
pub fn normalize_with_offsets(text: &str) -> (String, Vec<usize>) {
    let mut offsets = Vec::with_capacity(text.len());
    let normalized = normalize_inner(text, Some(&mut offsets));
    (normalized, offsets)
}

fn normalize_inner(text: &str, mut offsets: Option<&mut Vec<usize>>) -> String {
    let mut result = String::with_capacity(text.len());
    // Index of the first whitespace char of a pending run
    let mut pending_space: Option<usize> = None;

    for (idx, c) in text.chars().enumerate() {
        let Some(c) = fold(c) else { continue };

        if c.is_whitespace() {
            pending_space.get_or_insert(idx);
            continue;
        }

        if let Some(space_idx) = pending_space.take() {
            // Leading whitespace is dropped
            if !result.is_empty() {
                result.push(' ');
                if let Some(offsets) = offsets.as_deref_mut() {
                    offsets.push(space_idx);
                }
            }
        }

        result.push(c);
        if let Some(offsets) = offsets.as_deref_mut() {
            offsets.push(idx);
        }
    }

    result
}
