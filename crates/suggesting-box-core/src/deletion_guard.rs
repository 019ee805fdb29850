//! Atomic token protection for raw text changes.
//!
//! The host reports every edit as a before/after snapshot pair. This module decides whether
//! such an edit touches a token and, if so, computes the corrected text and cursor:
//!
//! - **Insertion inside a token** (`start < pos <= end`) is rejected: the text reverts to the old
//!   snapshot and the cursor jumps past the token (and its trailing space). Whitespace typed
//!   exactly at the token's end is allowed through.
//! - **Deletion touching a token** removes the whole token together with its trailing space.
//!   A token owns the single space that follows it, so deleting that space deletes the token.
//! - **Replacement over a token** (any length) removes the covered tokens whole and keeps the
//!   replacement text. Trailing spaces are left alone here, since the replacement usually
//!   relies on them as separators.
//!
//! Remaining tokens are relocated by text search afterwards, since a multi-token removal can
//! desynchronize simple offset arithmetic.

use crate::diff::{find_deletion_region, find_edit_region};
use crate::text::{char_at, char_len, is_blank};
use crate::token::Token;
use crate::token_store::TokenStore;
use ropey::Rope;
use std::cmp::Ordering;
use std::ops::Range;

/// What kind of correction was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionKind {
    /// An insertion landed inside a token and was reverted.
    InsertionRejected {
        /// Start of the token the insertion targeted.
        token_start: usize,
    },
    /// One or more tokens were removed whole.
    TokensRemoved,
}

/// The corrected state the caller must commit as a single transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCorrection<T> {
    /// What happened.
    pub kind: CorrectionKind,
    /// The corrected text.
    pub text: String,
    /// Where the cursor must be placed in `text`.
    pub cursor: usize,
    /// Tokens removed from the store (empty for rejected insertions).
    pub removed: Vec<Token<T>>,
}

/// Range of `token` extended by one trailing space, if `text` has one there.
fn owned_range<T>(text: &str, token: &Token<T>) -> Range<usize> {
    let end = token.end();
    if char_at(text, end) == Some(' ') {
        token.start..end + 1
    } else {
        token.start..end
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Check an edit against the token store.
///
/// Returns `None` if the edit does not touch a token; the caller should then shift token
/// positions as usual. Otherwise the store has already been updated and the returned
/// correction must be applied to the host before any other event fires.
pub fn guard_token_edit<T>(
    old_text: &str,
    new_text: &str,
    tokens: &mut TokenStore<T>,
) -> Option<TokenCorrection<T>> {
    if tokens.is_empty() {
        return None;
    }

    let old_len = char_len(old_text);
    let new_len = char_len(new_text);

    match new_len.cmp(&old_len) {
        Ordering::Greater => {
            if let Some(correction) = reject_insertion(old_text, new_text, tokens) {
                return Some(correction);
            }
            remove_replaced_tokens(old_text, new_text, tokens)
        }
        Ordering::Less if find_edit_region(old_text, new_text).new_len > 0 => {
            remove_replaced_tokens(old_text, new_text, tokens)
        }
        Ordering::Less => remove_deleted_tokens(old_text, new_text, tokens),
        Ordering::Equal => remove_replaced_tokens(old_text, new_text, tokens),
    }
}

fn reject_insertion<T>(
    old_text: &str,
    new_text: &str,
    tokens: &TokenStore<T>,
) -> Option<TokenCorrection<T>> {
    let region = find_edit_region(old_text, new_text);
    let token = tokens.insertion_target(region.position)?;

    if region.position == token.end() && is_blank(region.inserted_text(new_text)) {
        return None;
    }

    let mut cursor = token.end();
    if char_at(old_text, cursor) == Some(' ') {
        cursor += 1;
    }

    tracing::debug!(
        position = region.position,
        token_start = token.start,
        "rejecting insertion inside token"
    );

    Some(TokenCorrection {
        kind: CorrectionKind::InsertionRejected {
            token_start: token.start,
        },
        text: old_text.to_string(),
        cursor: cursor.min(char_len(old_text)),
        removed: Vec::new(),
    })
}

fn remove_deleted_tokens<T>(
    old_text: &str,
    new_text: &str,
    tokens: &mut TokenStore<T>,
) -> Option<TokenCorrection<T>> {
    let deletion = find_deletion_region(old_text, new_text);
    let deleted = deletion.position..deletion.end();

    let affected: Vec<Range<usize>> = tokens
        .iter()
        .map(|t| owned_range(old_text, t))
        .filter(|r| overlaps(r, &deleted))
        .collect();
    if affected.is_empty() {
        return None;
    }

    let removed = tokens.take_where(|t| overlaps(&owned_range(old_text, t), &deleted));
    Some(splice_out(old_text, deleted, &affected, "", removed, tokens))
}

fn remove_replaced_tokens<T>(
    old_text: &str,
    new_text: &str,
    tokens: &mut TokenStore<T>,
) -> Option<TokenCorrection<T>> {
    let region = find_edit_region(old_text, new_text);
    let replaced = region.position..region.old_end();
    if replaced.is_empty() {
        return None;
    }

    let affected: Vec<Range<usize>> = tokens
        .overlapping(replaced.clone())
        .map(Token::range)
        .collect();
    if affected.is_empty() {
        return None;
    }

    let removed = tokens.take_where(|t| t.overlaps(&replaced));
    let inserted = region.inserted_text(new_text);
    Some(splice_out(old_text, replaced, &affected, inserted, removed, tokens))
}

/// Remove the union of `edited` and the `affected` token ranges from `old_text`, put `inserted`
/// in its place, and re-derive the remaining token positions.
fn splice_out<T>(
    old_text: &str,
    edited: Range<usize>,
    affected: &[Range<usize>],
    inserted: &str,
    removed: Vec<Token<T>>,
    tokens: &mut TokenStore<T>,
) -> TokenCorrection<T> {
    let old_len = char_len(old_text);

    // Every affected range overlaps the edited range, so the union is a single span.
    let start = affected
        .iter()
        .map(|r| r.start)
        .fold(edited.start, usize::min)
        .min(old_len);
    let end = affected
        .iter()
        .map(|r| r.end)
        .fold(edited.end, usize::max)
        .min(old_len);

    let mut buffer = Rope::from_str(old_text);
    buffer.remove(start..end);
    buffer.insert(start, inserted);
    let text = buffer.to_string();

    let cursor = (start + char_len(inserted)).min(buffer.len_chars());
    let dropped = tokens.reconcile(&text);

    tracing::debug!(
        removed = removed.len(),
        dropped,
        span_start = start,
        span_end = end,
        cursor,
        "removed tokens touched by edit"
    );

    TokenCorrection {
        kind: CorrectionKind::TokensRemoved,
        text,
        cursor,
        removed,
    }
}
