//! Character-offset helpers.
//!
//! All public offsets in this crate are **character offsets** (Unicode scalar values), never
//! byte offsets. Host widgets frequently count UTF-16 code units instead; [`OffsetEncoding`]
//! converts at that boundary.

use serde::{Deserialize, Serialize};

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a character offset to a byte offset, clamping to the end of `text`.
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Convert a byte offset (on a char boundary) to a character offset.
pub fn byte_to_char(text: &str, byte_offset: usize) -> usize {
    let byte_offset = byte_offset.min(text.len());
    text[..byte_offset].chars().count()
}

/// Slice `text` by a half-open character range. Out-of-range bounds are clamped.
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte(text, start);
    let end_byte = char_to_byte(text, end.max(start));
    &text[start_byte..end_byte]
}

/// Character at `char_offset`, if any.
pub fn char_at(text: &str, char_offset: usize) -> Option<char> {
    text.chars().nth(char_offset)
}

/// Find `needle` in `text` at or after the character offset `from`.
///
/// Returns the character offset of the first match.
pub fn find_from(text: &str, needle: &str, from: usize) -> Option<usize> {
    let from_byte = char_to_byte(text, from);
    text[from_byte..]
        .find(needle)
        .map(|byte| byte_to_char(text, from_byte + byte))
}

/// `true` if `text` is non-empty and consists only of whitespace.
pub fn is_blank(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_whitespace)
}

/// `true` if `text` contains `\n` or `\r`.
pub fn contains_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

/// Convert a character offset to a UTF-16 code unit offset.
pub fn char_offset_to_utf16(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}

/// Convert a UTF-16 code unit offset to a character offset.
///
/// An offset that lands in the middle of a surrogate pair rounds up to the next character.
pub fn utf16_to_char_offset(text: &str, utf16_offset: usize) -> usize {
    let mut current_utf16 = 0;
    let mut char_count = 0;

    for ch in text.chars() {
        if current_utf16 >= utf16_offset {
            break;
        }
        current_utf16 += ch.len_utf16();
        char_count += 1;
    }

    char_count
}

/// Unit in which the host widget reports and accepts text offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetEncoding {
    /// Unicode scalar values (the crate's native unit).
    #[default]
    Chars,
    /// UTF-16 code units (WinUI, Android, UIKit text controls).
    Utf16,
}

impl OffsetEncoding {
    /// Convert a host offset into a character offset within `text`.
    pub fn to_chars(self, text: &str, host_offset: usize) -> usize {
        match self {
            Self::Chars => host_offset.min(char_len(text)),
            Self::Utf16 => utf16_to_char_offset(text, host_offset),
        }
    }

    /// Convert a character offset within `text` into a host offset.
    pub fn from_chars(self, text: &str, char_offset: usize) -> usize {
        match self {
            Self::Chars => char_offset.min(char_len(text)),
            Self::Utf16 => char_offset_to_utf16(text, char_offset),
        }
    }
}
