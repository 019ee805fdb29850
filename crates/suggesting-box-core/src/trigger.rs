//! Suggestion trigger detection.
//!
//! Scans backward from the cursor for a prefix character that sits at a word boundary (start of
//! text or after whitespace). Characters inside existing tokens are skipped, and the scan stops
//! at the first whitespace other than the character immediately left of the cursor.

use crate::text::contains_line_break;
use crate::token_store::TokenStore;

/// An active trigger found left of the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// The prefix character that opened the trigger.
    pub prefix: char,
    /// Character offset of the prefix.
    pub start: usize,
    /// Text between the prefix and the cursor.
    pub query: String,
}

/// Detect an active trigger at `cursor`.
///
/// ```rust
/// use suggesting_box_core::{TokenStore, detect_trigger};
///
/// let tokens = TokenStore::<()>::new();
/// let trigger = detect_trigger("hello @bob", 10, &['@', '#'], &tokens).unwrap();
/// assert_eq!(trigger.prefix, '@');
/// assert_eq!(trigger.query, "bob");
///
/// assert!(detect_trigger("a@b", 2, &['@'], &tokens).is_none());
/// ```
pub fn detect_trigger<T>(
    text: &str,
    cursor: usize,
    prefixes: &[char],
    tokens: &TokenStore<T>,
) -> Option<Trigger> {
    if text.is_empty() || prefixes.is_empty() {
        return None;
    }

    let chars: Vec<char> = text.chars().take(cursor).collect();
    let cursor = chars.len();

    let mut found = None;
    for index in (0..cursor).rev() {
        if tokens.covers(index) {
            continue;
        }

        let ch = chars[index];
        if ch.is_whitespace() && index != cursor - 1 {
            break;
        }

        if !prefixes.contains(&ch) {
            continue;
        }
        if index == 0 || chars[index - 1].is_whitespace() {
            found = Some((index, ch));
            break;
        }
    }

    let (start, prefix) = found?;
    let query: String = chars[start + 1..cursor].iter().collect();
    if contains_line_break(&query) {
        tracing::trace!(start, "trigger query spans a line break");
        return None;
    }

    tracing::trace!(%prefix, start, query = %query, "trigger detected");
    Some(Trigger {
        prefix,
        start,
        query,
    })
}
