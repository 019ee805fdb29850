//! The suggesting box controller.
//!
//! [`SuggestingBox`] owns the authoritative text buffer and token store. The host forwards raw
//! text and caret notifications; the controller runs the token guards, keeps token positions in
//! sync, detects suggestion triggers, and pushes corrections back through the
//! [`PlatformAdapter`].
//!
//! # Event flow
//!
//! ```text
//! host text change ──► deletion guard ──► (correction) ──► reset host, defer confirmation
//!                           │
//!                           └──► shift tokens ──► commit ──► trigger detection ──► events
//! ```
//!
//! Corrections that the host widget may ignore when applied synchronously are confirmed on the
//! next call to [`SuggestingBox::run_deferred`]. Every committed mutation bumps the generation
//! counter, and deferred tasks stamped with an older generation are discarded.

use crate::adapter::{PlatformAdapter, SubscriptionHandle, format_spans};
use crate::config::SuggestingBoxConfig;
use crate::cursor_guard::relocate_cursor;
use crate::deletion_guard::{CorrectionKind, TokenCorrection, guard_token_edit};
use crate::diff::find_edit_region;
use crate::dispatch::{DeferredQueue, DeferredTask};
use crate::error::{ConfigError, ContentError};
use crate::snapshot::ContentSnapshot;
use crate::suggestion::{SuggestionChoice, SuggestionSource, SuggestionState, insert_token};
use crate::text::char_len;
use crate::token::Token;
use crate::token_store::{TokenStore, validate_tokens};
use crate::trigger::detect_trigger;

/// Notifications raised by [`SuggestingBox`].
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestingBoxEvent<T> {
    /// The committed text changed.
    TextChanged {
        /// Text before the change.
        old_text: String,
        /// Text after the change.
        new_text: String,
    },
    /// Candidates are available for the active trigger.
    SuggestionsShown {
        /// Active prefix.
        prefix: String,
        /// Query typed after the prefix.
        query: String,
        /// Number of candidates.
        count: usize,
    },
    /// The suggestion list should be hidden.
    SuggestionsHidden,
    /// A token was created from a chosen suggestion.
    TokenInserted {
        /// The new token.
        token: Token<T>,
    },
    /// Tokens were removed whole by an edit.
    TokensRemoved {
        /// The removed tokens, in ascending start order.
        tokens: Vec<Token<T>>,
    },
    /// An insertion inside a token was reverted.
    InsertionRejected {
        /// Start of the protected token.
        token_start: usize,
    },
    /// The caret was pushed out of a token interior.
    CursorRelocated {
        /// Character offset the host reported.
        from: usize,
        /// Character offset the caret was moved to.
        to: usize,
    },
    /// The adapter reported a pasted image.
    ImageInserted {
        /// Raw image data.
        data: Vec<u8>,
    },
}

/// Event callback type.
pub type EventCallback<T> = Box<dyn FnMut(&SuggestingBoxEvent<T>)>;

#[derive(Debug, Clone, Copy)]
struct Subscriptions {
    cursor: SubscriptionHandle,
    paste: SubscriptionHandle,
}

/// Token-aware text field engine.
///
/// # Example
///
/// ```rust
/// use suggesting_box_core::{
///     FnSuggestionSource, NullAdapter, SuggestingBox, SuggestingBoxConfig, SuggestionChoice,
/// };
///
/// let mut sbox = SuggestingBox::new(SuggestingBoxConfig::new("#"), NullAdapter::default())
///     .unwrap()
///     .with_source(FnSuggestionSource::new(
///         |_prefix, query: &str| vec![format!("{query}Conf")],
///         |_prefix, item: &String| SuggestionChoice::new(item.clone()),
///     ));
///
/// sbox.on_text_changed("", "Hi #Rust");
/// assert_eq!(sbox.candidates(), ["RustConf".to_string()]);
///
/// assert!(sbox.select_suggestion(0));
/// assert_eq!(sbox.text(), "Hi #RustConf ");
/// assert_eq!(sbox.cursor(), 13);
/// ```
pub struct SuggestingBox<T, A: PlatformAdapter> {
    config: SuggestingBoxConfig,
    prefixes: Vec<char>,
    adapter: A,
    source: Option<Box<dyn SuggestionSource<T>>>,

    text: String,
    cursor: usize,
    last_cursor: Option<usize>,
    tokens: TokenStore<T>,
    suggestion: SuggestionState,
    candidates: Vec<T>,
    measured_item_height: f64,

    generation: u64,
    pending_correction: Option<u64>,
    deferred: DeferredQueue,

    subscriptions: Option<Subscriptions>,
    callbacks: Vec<EventCallback<T>>,
}

impl<T: Clone, A: PlatformAdapter> SuggestingBox<T, A> {
    /// Create an empty controller.
    pub fn new(config: SuggestingBoxConfig, adapter: A) -> Result<Self, ConfigError> {
        config.validate()?;
        let prefixes = config.prefix_chars();
        Ok(Self {
            config,
            prefixes,
            adapter,
            source: None,
            text: String::new(),
            cursor: 0,
            last_cursor: None,
            tokens: TokenStore::new(),
            suggestion: SuggestionState::default(),
            candidates: Vec::new(),
            measured_item_height: 0.0,
            generation: 0,
            pending_correction: None,
            deferred: DeferredQueue::new(),
            subscriptions: None,
            callbacks: Vec::new(),
        })
    }

    /// Set the suggestion source (builder form).
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: SuggestionSource<T> + 'static,
    {
        self.set_source(source);
        self
    }

    /// Set the suggestion source.
    ///
    /// Without a source, triggers stay active until the host calls
    /// [`set_candidates`](Self::set_candidates).
    pub fn set_source<S>(&mut self, source: S)
    where
        S: SuggestionSource<T> + 'static,
    {
        self.source = Some(Box::new(source));
        self.measured_item_height = 0.0;
    }

    /// Subscribe to controller events.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&SuggestingBoxEvent<T>) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    // ----- host lifecycle -----

    /// Take the native cursor and paste subscriptions. Calling it twice is a no-op.
    pub fn attach(&mut self) {
        if self.subscriptions.is_some() {
            return;
        }
        let cursor = self.adapter.subscribe_cursor();
        let paste = self.adapter.subscribe_paste();
        tracing::debug!(?cursor, ?paste, "attached to host");
        self.subscriptions = Some(Subscriptions { cursor, paste });
    }

    /// Release the subscriptions taken by [`attach`](Self::attach).
    pub fn detach(&mut self) {
        if let Some(subscriptions) = self.subscriptions.take() {
            self.adapter.unsubscribe(subscriptions.cursor);
            self.adapter.unsubscribe(subscriptions.paste);
            tracing::debug!("detached from host");
        }
    }

    /// `true` between [`attach`](Self::attach) and [`detach`](Self::detach).
    pub fn is_attached(&self) -> bool {
        self.subscriptions.is_some()
    }

    // ----- host notifications -----

    /// Process a raw text change reported as a before/after snapshot pair.
    pub fn on_text_changed(&mut self, old_text: &str, new_text: &str) {
        if let Some(generation) = self.pending_correction {
            tracing::debug!(generation, "ignoring text change while a correction is pending");
            return;
        }
        if old_text == new_text || new_text == self.text {
            return;
        }
        if old_text != self.text {
            let dropped = self.tokens.reconcile(old_text);
            tracing::debug!(dropped, "host snapshot diverged from the buffer, adopting it");
            self.text = old_text.to_string();
        }

        if let Some(correction) = guard_token_edit(old_text, new_text, &mut self.tokens) {
            self.apply_correction(correction);
            return;
        }

        let region = find_edit_region(old_text, new_text);
        self.tokens.shift_from(region.old_end(), region.shift());
        self.commit_text(new_text.to_string());
        self.set_cursor_position(region.new_end());
        self.refresh_suggestions();
        if !self.tokens.is_empty() {
            self.schedule_formatting();
        }
    }

    /// Process the host's current text, using the buffer as the old snapshot.
    pub fn on_host_text(&mut self, new_text: &str) {
        let old_text = self.text.clone();
        self.on_text_changed(&old_text, new_text);
    }

    /// Process a native caret move. Offsets are in host units.
    pub fn on_native_cursor_moved(&mut self, previous: Option<usize>, current: usize) {
        let encoding = self.config.offset_encoding;
        let previous = previous.map(|p| encoding.to_chars(&self.text, p));
        let current = encoding.to_chars(&self.text, current);
        self.handle_cursor(previous, current);
    }

    /// Process a caret position change, inferring direction from the last observed position.
    /// The offset is in host units.
    pub fn on_cursor_position_changed(&mut self, current: usize) {
        let current = self.config.offset_encoding.to_chars(&self.text, current);
        self.handle_cursor(self.last_cursor, current);
    }

    /// Forward a pasted image. Ignored unless attached.
    pub fn on_image_pasted(&mut self, data: Vec<u8>) {
        if self.subscriptions.is_none() {
            tracing::debug!(bytes = data.len(), "ignoring image paste while detached");
            return;
        }
        self.emit(SuggestingBoxEvent::ImageInserted { data });
    }

    // ----- suggestions -----

    /// Supply candidates for the active trigger. An empty list hides the suggestions.
    pub fn set_candidates(&mut self, candidates: Vec<T>) {
        if !self.suggestion.is_active() {
            tracing::debug!("ignoring candidates without an active trigger");
            return;
        }
        self.show_candidates(candidates);
    }

    /// Choose the candidate at `index`. Returns `true` if a token was inserted.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        match self.candidates.get(index).cloned() {
            Some(item) => self.commit_suggestion(item),
            None => false,
        }
    }

    /// Turn `item` into a token at the active trigger, asking the source how to display it.
    pub fn commit_suggestion(&mut self, item: T) -> bool {
        let Some(prefix) = self.suggestion.prefix.chars().next() else {
            return false;
        };
        let Some(source) = self.source.as_mut() else {
            tracing::debug!("no suggestion source to describe the chosen item");
            return false;
        };
        let choice = source.suggestion_chosen(prefix, &item);
        self.commit_choice(choice, Some(item))
    }

    /// Insert a token with an explicit display text and format at the active trigger.
    pub fn commit_choice(&mut self, choice: SuggestionChoice, item: Option<T>) -> bool {
        if self.pending_correction.is_some() {
            return false;
        }
        let Some(insertion) =
            insert_token(&self.text, &mut self.tokens, &self.suggestion, choice, item)
        else {
            return false;
        };

        self.commit_text(insertion.text);
        self.set_cursor_position(insertion.cursor);
        let host_cursor = self.host_offset(insertion.cursor);
        self.adapter.reset_text(&self.text, host_cursor);
        self.hide_suggestions();

        if let Some(token) = self.tokens.token_at(insertion.token_start).cloned() {
            self.emit(SuggestingBoxEvent::TokenInserted { token });
        }
        self.schedule_formatting();
        true
    }

    /// Hide the suggestions and forget the active trigger.
    pub fn dismiss_suggestions(&mut self) {
        self.hide_suggestions();
    }

    /// Height for the suggestion list, capped by the config.
    ///
    /// The first measurement of a non-empty list caches a per-item height, after which the list
    /// is sized from the candidate count so it shrinks as the query narrows. Until the host can
    /// report a content height the full maximum is used so every row gets rendered.
    pub fn suggestion_list_height(&mut self) -> f64 {
        let max = self.config.max_suggestion_height;
        let count = self.candidates.len();
        if count == 0 {
            return 0.0;
        }
        if self.measured_item_height > 0.0 {
            return (count as f64 * self.measured_item_height).min(max);
        }

        let content = self.adapter.measure_content_height();
        if content <= 0.0 {
            return max;
        }
        self.measured_item_height = content / count as f64;
        tracing::trace!(item_height = self.measured_item_height, "measured suggestion rows");
        content.min(max)
    }

    /// Forget the cached row height, e.g. after the host changes how candidates are drawn.
    pub fn invalidate_item_height(&mut self) {
        self.measured_item_height = 0.0;
    }

    // ----- content -----

    /// Replace the content, skipping tokens that do not fit the text. Returns the number of
    /// tokens accepted.
    pub fn set_content(&mut self, text: impl Into<String>, mut tokens: Vec<Token<T>>) -> usize {
        let text = text.into();
        tokens.sort_by_key(|t| t.start);

        let mut accepted: Vec<Token<T>> = Vec::with_capacity(tokens.len());
        for token in tokens {
            if let Some(previous) = accepted.last()
                && token.start < previous.end()
            {
                tracing::warn!(
                    start = token.start,
                    previous_end = previous.end(),
                    "skipping overlapping token"
                );
                continue;
            }
            if let Err(err) = validate_tokens(&text, std::slice::from_ref(&token)) {
                tracing::warn!(%err, "skipping invalid token");
                continue;
            }
            accepted.push(token);
        }

        let count = accepted.len();
        self.reset_content(text, TokenStore::from_tokens(accepted));
        count
    }

    /// Replace the content, failing if any token does not fit the text.
    pub fn try_set_content(
        &mut self,
        text: impl Into<String>,
        tokens: Vec<Token<T>>,
    ) -> Result<(), ContentError> {
        let text = text.into();
        let store = TokenStore::from_tokens(tokens);
        store.validate(&text)?;
        self.reset_content(text, store);
        Ok(())
    }

    /// Copy of the tokens in ascending start order.
    pub fn get_tokens(&self) -> Vec<Token<T>> {
        self.tokens.as_slice().to_vec()
    }

    /// Capture the text and tokens.
    pub fn snapshot(&self) -> ContentSnapshot<T> {
        ContentSnapshot::new(self.text.clone(), self.get_tokens())
    }

    /// Restore a snapshot taken by [`snapshot`](Self::snapshot).
    pub fn restore(&mut self, snapshot: ContentSnapshot<T>) -> Result<(), ContentError> {
        self.try_set_content(snapshot.text, snapshot.tokens)
    }

    // ----- deferred work -----

    /// Run the deferred tasks queued before this call. Returns the number of tasks applied.
    pub fn run_deferred(&mut self) -> usize {
        let mut applied = 0;
        for task in self.deferred.take_batch() {
            if let DeferredTask::ConfirmCorrection { generation, .. } = task
                && self.pending_correction == Some(generation)
            {
                self.pending_correction = None;
            }
            if let Some(generation) = task.generation()
                && generation != self.generation
            {
                tracing::debug!(
                    generation,
                    current = self.generation,
                    "discarding stale deferred task"
                );
                continue;
            }

            match task {
                DeferredTask::ConfirmCorrection { cursor, .. } => {
                    let host_cursor = self.host_offset(cursor);
                    self.adapter.reset_text(&self.text, host_cursor);
                }
                DeferredTask::RelocateCursor { cursor, .. } => {
                    let host_cursor = self.host_offset(cursor);
                    self.adapter.set_cursor(host_cursor);
                }
                DeferredTask::ApplyFormatting => {
                    let spans = format_spans(&self.text, &self.tokens, self.config.offset_encoding);
                    self.adapter.apply_formatting(&self.text, &spans);
                }
            }
            applied += 1;
        }
        applied
    }

    /// `true` if [`run_deferred`](Self::run_deferred) has work to do.
    pub fn has_deferred_work(&self) -> bool {
        !self.deferred.is_empty()
    }

    // ----- queries -----

    /// The committed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The cursor as a character offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The cursor in host units.
    pub fn host_cursor(&self) -> usize {
        self.host_offset(self.cursor)
    }

    /// The token store.
    pub fn tokens(&self) -> &TokenStore<T> {
        &self.tokens
    }

    /// The active trigger, if any.
    pub fn suggestion_state(&self) -> &SuggestionState {
        &self.suggestion
    }

    /// Candidates for the active trigger.
    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }

    /// Current generation stamp.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` while a correction waits for its deferred confirmation.
    pub fn is_correction_pending(&self) -> bool {
        self.pending_correction.is_some()
    }

    /// The platform adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Mutable access to the platform adapter.
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// The configuration.
    pub fn config(&self) -> &SuggestingBoxConfig {
        &self.config
    }

    // ----- internals -----

    fn host_offset(&self, cursor: usize) -> usize {
        self.config.offset_encoding.from_chars(&self.text, cursor)
    }

    fn set_cursor_position(&mut self, cursor: usize) {
        self.cursor = cursor.min(char_len(&self.text));
        self.last_cursor = Some(self.cursor);
    }

    fn commit_text(&mut self, text: String) {
        let old_text = std::mem::replace(&mut self.text, text);
        self.generation += 1;
        if old_text != self.text {
            let new_text = self.text.clone();
            self.emit(SuggestingBoxEvent::TextChanged { old_text, new_text });
        }
    }

    fn apply_correction(&mut self, correction: TokenCorrection<T>) {
        let TokenCorrection {
            kind,
            text,
            cursor,
            removed,
        } = correction;
        tracing::debug!(?kind, cursor, removed = removed.len(), "applying token correction");

        self.hide_suggestions();
        match kind {
            CorrectionKind::InsertionRejected { token_start } => {
                self.emit(SuggestingBoxEvent::InsertionRejected { token_start });
            }
            CorrectionKind::TokensRemoved => {
                self.emit(SuggestingBoxEvent::TokensRemoved { tokens: removed });
            }
        }

        self.commit_text(text);
        self.set_cursor_position(cursor);

        let generation = self.generation;
        self.pending_correction = Some(generation);
        let host_cursor = self.host_offset(self.cursor);
        self.adapter.reset_text(&self.text, host_cursor);
        self.deferred.push(DeferredTask::ConfirmCorrection {
            generation,
            cursor: self.cursor,
        });
        self.deferred.push(DeferredTask::ApplyFormatting);
        self.adapter.request_deferred_run();
    }

    fn reset_content(&mut self, text: String, tokens: TokenStore<T>) {
        self.pending_correction = None;
        self.deferred.clear();
        self.hide_suggestions();

        self.tokens = tokens;
        self.commit_text(text);
        self.set_cursor_position(char_len(&self.text));

        let host_cursor = self.host_offset(self.cursor);
        self.adapter.reset_text(&self.text, host_cursor);
        self.schedule_formatting();
    }

    fn handle_cursor(&mut self, previous: Option<usize>, current: usize) {
        if self.pending_correction.is_some() {
            tracing::debug!(current, "ignoring caret move while a correction is pending");
            return;
        }

        let relocated = if self.tokens.is_empty() {
            None
        } else {
            relocate_cursor(
                &self.text,
                &self.tokens,
                previous,
                current,
                self.config.skip_trailing_space,
            )
        };

        match relocated {
            Some(target) => {
                self.set_cursor_position(target);
                self.emit(SuggestingBoxEvent::CursorRelocated {
                    from: current,
                    to: self.cursor,
                });
                self.deferred.push(DeferredTask::RelocateCursor {
                    generation: self.generation,
                    cursor: self.cursor,
                });
                self.adapter.request_deferred_run();
            }
            None => self.set_cursor_position(current),
        }
    }

    fn refresh_suggestions(&mut self) {
        let Some(trigger) = detect_trigger(&self.text, self.cursor, &self.prefixes, &self.tokens)
        else {
            self.hide_suggestions();
            return;
        };

        self.suggestion = SuggestionState::from_trigger(&trigger);
        match self.source.as_mut() {
            Some(source) => {
                let candidates = source.request_suggestions(trigger.prefix, &trigger.query);
                self.show_candidates(candidates);
            }
            None => self.candidates.clear(),
        }
    }

    fn show_candidates(&mut self, candidates: Vec<T>) {
        if candidates.is_empty() {
            self.hide_suggestions();
            return;
        }
        self.candidates = candidates;
        let event = SuggestingBoxEvent::SuggestionsShown {
            prefix: self.suggestion.prefix.clone(),
            query: self.suggestion.query.clone(),
            count: self.candidates.len(),
        };
        self.emit(event);
    }

    fn hide_suggestions(&mut self) {
        let was_visible = !self.candidates.is_empty();
        self.suggestion.clear();
        self.candidates.clear();
        if was_visible {
            self.emit(SuggestingBoxEvent::SuggestionsHidden);
        }
    }

    fn schedule_formatting(&mut self) {
        if self.deferred.push(DeferredTask::ApplyFormatting) {
            self.adapter.request_deferred_run();
        }
    }

    fn emit(&mut self, event: SuggestingBoxEvent<T>) {
        for callback in &mut self.callbacks {
            callback(&event);
        }
    }
}
