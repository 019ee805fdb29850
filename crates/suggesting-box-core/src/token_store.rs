//! Ordered token storage.
//!
//! Tokens are kept sorted by start offset in a plain vector. At every committed state they are
//! non-overlapping, which lets point queries locate the only candidate with a binary search.

use crate::error::ContentError;
use crate::text::{char_len, find_from, slice_chars};
use crate::token::Token;
use std::ops::Range;

/// Check that `tokens` (sorted by start) are non-empty, in bounds, non-overlapping, and that
/// each one matches the text at its range.
pub fn validate_tokens<T>(text: &str, tokens: &[Token<T>]) -> Result<(), ContentError> {
    let text_len = char_len(text);
    let mut previous_end = 0;

    for (index, token) in tokens.iter().enumerate() {
        if token.is_empty() {
            return Err(ContentError::Empty {
                index,
                start: token.start,
            });
        }
        if index > 0 && token.start < previous_end {
            return Err(ContentError::Overlap {
                index,
                start: token.start,
                previous_end,
            });
        }
        if token.end() > text_len {
            return Err(ContentError::OutOfBounds {
                index,
                start: token.start,
                end: token.end(),
                text_len,
            });
        }
        let found = slice_chars(text, token.start, token.end());
        let expected = token.full_text();
        if found != expected {
            return Err(ContentError::TextMismatch {
                index,
                start: token.start,
                expected,
                found: found.to_string(),
            });
        }
        previous_end = token.end();
    }

    Ok(())
}

/// Sorted collection of [`Token`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStore<T> {
    tokens: Vec<Token<T>>,
}

impl<T> Default for TokenStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TokenStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Build a store from arbitrary tokens (sorted by start, stable).
    pub fn from_tokens(mut tokens: Vec<Token<T>>) -> Self {
        tokens.sort_by_key(|t| t.start);
        Self { tokens }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// `true` if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate tokens in ascending start order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token<T>> {
        self.tokens.iter()
    }

    /// Tokens in ascending start order.
    pub fn as_slice(&self) -> &[Token<T>] {
        &self.tokens
    }

    /// Insert a token, keeping start order. Ties go after existing tokens.
    pub fn insert(&mut self, token: Token<T>) {
        let pos = self.tokens.partition_point(|t| t.start <= token.start);
        self.tokens.insert(pos, token);
    }

    /// Replace every token.
    pub fn replace_all(&mut self, tokens: Vec<Token<T>>) {
        *self = Self::from_tokens(tokens);
    }

    /// Remove every token.
    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// The token covering `pos` (`start <= pos < end`).
    pub fn token_at(&self, pos: usize) -> Option<&Token<T>> {
        let idx = self.tokens.partition_point(|t| t.start <= pos);
        idx.checked_sub(1)
            .map(|i| &self.tokens[i])
            .filter(|t| t.contains(pos))
    }

    /// `true` if some token covers `pos`.
    pub fn covers(&self, pos: usize) -> bool {
        self.token_at(pos).is_some()
    }

    /// The token that `pos` sits strictly inside of (`start < pos < end`).
    pub fn token_around(&self, pos: usize) -> Option<&Token<T>> {
        self.token_at(pos).filter(|t| t.contains_interior(pos))
    }

    /// The token an insertion at `pos` would land in (`start < pos <= end`).
    pub fn insertion_target(&self, pos: usize) -> Option<&Token<T>> {
        self.tokens
            .iter()
            .find(|t| t.start < pos && pos <= t.end())
    }

    /// Tokens overlapping the half-open `range`.
    pub fn overlapping(&self, range: Range<usize>) -> impl Iterator<Item = &Token<T>> {
        self.tokens.iter().filter(move |t| t.overlaps(&range))
    }

    /// Shift every token whose start is `>= threshold`.
    pub fn shift_from(&mut self, threshold: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        for token in self.tokens.iter_mut().filter(|t| t.start >= threshold) {
            token.shift(delta);
        }
    }

    /// Shift every token whose start is `> pos`.
    pub fn shift_after(&mut self, pos: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        for token in self.tokens.iter_mut().filter(|t| t.start > pos) {
            token.shift(delta);
        }
    }

    /// Remove and return every token matching `predicate`, preserving order on both sides.
    pub fn take_where(&mut self, mut predicate: impl FnMut(&Token<T>) -> bool) -> Vec<Token<T>> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tokens)
            .into_iter()
            .partition(|t| predicate(t));
        self.tokens = kept;
        taken
    }

    /// Relocate tokens by searching `text` for each token's full text.
    ///
    /// Tokens are processed in ascending start order; each search begins at the end of the
    /// previous match. Tokens whose text cannot be found are dropped. Returns the number of
    /// dropped tokens.
    ///
    /// A token whose text also occurs earlier (between the previous match and its true
    /// position) is relocated to that earlier occurrence.
    pub fn reconcile(&mut self, text: &str) -> usize {
        let mut search_start = 0;
        let before = self.tokens.len();

        self.tokens.sort_by_key(|t| t.start);
        self.tokens.retain_mut(|token| {
            let full_text = token.full_text();
            if full_text.is_empty() {
                return false;
            }
            match find_from(text, &full_text, search_start) {
                Some(index) => {
                    token.start = index;
                    search_start = index + token.len();
                    true
                }
                None => {
                    tracing::warn!(
                        token = %full_text,
                        previous_start = token.start,
                        "dropping token that no longer appears in the text"
                    );
                    false
                }
            }
        });

        before - self.tokens.len()
    }

    /// Check the store against `text`.
    pub fn validate(&self, text: &str) -> Result<(), ContentError> {
        validate_tokens(text, &self.tokens)
    }

    /// Consume the store.
    pub fn into_vec(self) -> Vec<Token<T>> {
        self.tokens
    }
}

impl<'a, T> IntoIterator for &'a TokenStore<T> {
    type Item = &'a Token<T>;
    type IntoIter = std::slice::Iter<'a, Token<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
