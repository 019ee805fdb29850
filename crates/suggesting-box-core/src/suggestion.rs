//! Suggestion state and token insertion.

use crate::text::{char_len, slice_chars};
use crate::token::{Token, TokenFormat};
use crate::token_store::TokenStore;
use crate::trigger::Trigger;
use ropey::Rope;

/// The trigger currently being completed, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState {
    /// Active prefix (empty when inactive).
    pub prefix: String,
    /// Text typed after the prefix.
    pub query: String,
    /// Character offset of the prefix; `None` when inactive.
    pub prefix_start: Option<usize>,
}

impl SuggestionState {
    /// Build an active state from a detected trigger.
    pub fn from_trigger(trigger: &Trigger) -> Self {
        Self {
            prefix: trigger.prefix.to_string(),
            query: trigger.query.clone(),
            prefix_start: Some(trigger.start),
        }
    }

    /// `true` while a trigger is active.
    pub fn is_active(&self) -> bool {
        self.prefix_start.is_some()
    }

    /// Reset to inactive.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// How a chosen suggestion should appear as a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionChoice {
    /// Text shown after the prefix. Empty aborts the insertion.
    pub display_text: String,
    /// Visual attributes of the token.
    pub format: TokenFormat,
}

impl SuggestionChoice {
    /// A choice with default formatting.
    pub fn new(display_text: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            format: TokenFormat::default(),
        }
    }

    /// Set the token format.
    pub fn with_format(mut self, format: TokenFormat) -> Self {
        self.format = format;
        self
    }
}

/// Host-side provider of suggestion candidates.
pub trait SuggestionSource<T> {
    /// Return candidates for `prefix` + `query`. An empty list hides the suggestion popup.
    fn request_suggestions(&mut self, prefix: char, query: &str) -> Vec<T>;

    /// Decide how `item` is shown once chosen.
    fn suggestion_chosen(&mut self, prefix: char, item: &T) -> SuggestionChoice;
}

/// A [`SuggestionSource`] built from two closures.
pub struct FnSuggestionSource<R, C> {
    request: R,
    chosen: C,
}

impl<R, C> FnSuggestionSource<R, C> {
    /// Wrap `request` and `chosen`.
    pub fn new<T>(request: R, chosen: C) -> Self
    where
        R: FnMut(char, &str) -> Vec<T>,
        C: FnMut(char, &T) -> SuggestionChoice,
    {
        Self { request, chosen }
    }
}

impl<T, R, C> SuggestionSource<T> for FnSuggestionSource<R, C>
where
    R: FnMut(char, &str) -> Vec<T>,
    C: FnMut(char, &T) -> SuggestionChoice,
{
    fn request_suggestions(&mut self, prefix: char, query: &str) -> Vec<T> {
        (self.request)(prefix, query)
    }

    fn suggestion_chosen(&mut self, prefix: char, item: &T) -> SuggestionChoice {
        (self.chosen)(prefix, item)
    }
}

/// Result of [`insert_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInsertion {
    /// Text with the token (and its trailing space) in place of the query.
    pub text: String,
    /// Cursor after the token and its trailing space.
    pub cursor: usize,
    /// Start offset of the new token.
    pub token_start: usize,
}

/// Replace the active prefix and query with a token followed by one space.
///
/// Returns `None` (leaving `tokens` untouched) when the state is inactive, the display text is
/// empty, the state no longer matches `text`, or the query range overlaps an existing token.
pub fn insert_token<T>(
    text: &str,
    tokens: &mut TokenStore<T>,
    state: &SuggestionState,
    choice: SuggestionChoice,
    item: Option<T>,
) -> Option<TokenInsertion> {
    let start = state.prefix_start?;
    if choice.display_text.is_empty() {
        return None;
    }

    let text_len = char_len(text);
    let query_end = (start + char_len(&state.prefix) + char_len(&state.query)).min(text_len);
    if start >= query_end || !slice_chars(text, start, query_end).starts_with(&state.prefix) {
        tracing::warn!(start, "suggestion state no longer matches the text");
        return None;
    }

    let replaced = start..query_end;
    if tokens.overlapping(replaced.clone()).next().is_some() {
        tracing::warn!(
            start,
            end = query_end,
            "refusing to insert a token over an existing token"
        );
        return None;
    }

    let token = Token {
        start,
        prefix: state.prefix.clone(),
        display_text: choice.display_text,
        format: choice.format,
        item,
    };
    let mut inserted = token.full_text();
    inserted.push(' ');

    let inserted_len = char_len(&inserted);
    let delta = inserted_len as isize - (query_end - start) as isize;
    tokens.shift_after(start, delta);

    let mut buffer = Rope::from_str(text);
    buffer.remove(replaced);
    buffer.insert(start, &inserted);

    tokens.insert(token);

    Some(TokenInsertion {
        text: buffer.to_string(),
        cursor: start + inserted_len,
        token_start: start,
    })
}
