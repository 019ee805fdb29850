//! Platform adapter interface.
//!
//! The engine never touches a UI toolkit. Everything host-specific (painting token spans,
//! forcing the native text/caret, list measurement, native event subscriptions) goes through
//! [`PlatformAdapter`], implemented once per host target.
//!
//! Offsets passed to an adapter are in the host's unit (see
//! [`OffsetEncoding`](crate::OffsetEncoding)).

use crate::text::{OffsetEncoding, char_len};
use crate::token::TokenFormat;
use crate::token_store::TokenStore;

/// Opaque handle for a native subscription.
///
/// Returned by `subscribe_*` and handed back verbatim to
/// [`unsubscribe`](PlatformAdapter::unsubscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u64);

/// A formatted range of the live text, in host offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpan {
    /// Inclusive start.
    pub start: usize,
    /// Exclusive end.
    pub end: usize,
    /// Attributes to render.
    pub format: TokenFormat,
}

/// Capabilities the engine needs from a host text control.
pub trait PlatformAdapter {
    /// Replace all token formatting on the live text with `spans`.
    fn apply_formatting(&mut self, text: &str, spans: &[FormatSpan]);

    /// Force the native text and caret.
    fn reset_text(&mut self, text: &str, cursor: usize);

    /// Move the native caret without touching the text.
    fn set_cursor(&mut self, cursor: usize);

    /// Rendered height of the suggestion list content, or `0.0` if unknown.
    fn measure_content_height(&self) -> f64 {
        0.0
    }

    /// Start delivering native caret notifications.
    fn subscribe_cursor(&mut self) -> SubscriptionHandle;

    /// Start delivering pasted-image notifications.
    fn subscribe_paste(&mut self) -> SubscriptionHandle;

    /// Stop a subscription started by `subscribe_*`.
    fn unsubscribe(&mut self, handle: SubscriptionHandle);

    /// Deferred work is queued; the host should call
    /// [`SuggestingBox::run_deferred`](crate::SuggestingBox::run_deferred) on its next
    /// event-loop turn.
    fn request_deferred_run(&mut self) {}
}

/// An adapter that does nothing. Useful for headless use and tests.
#[derive(Debug, Default)]
pub struct NullAdapter {
    next_handle: u64,
}

impl PlatformAdapter for NullAdapter {
    fn apply_formatting(&mut self, _text: &str, _spans: &[FormatSpan]) {}

    fn reset_text(&mut self, _text: &str, _cursor: usize) {}

    fn set_cursor(&mut self, _cursor: usize) {}

    fn subscribe_cursor(&mut self) -> SubscriptionHandle {
        self.next_handle += 1;
        SubscriptionHandle(self.next_handle)
    }

    fn subscribe_paste(&mut self) -> SubscriptionHandle {
        self.next_handle += 1;
        SubscriptionHandle(self.next_handle)
    }

    fn unsubscribe(&mut self, _handle: SubscriptionHandle) {}
}

/// Build the formatting spans for `tokens` over `text`.
///
/// Tokens whose range falls outside the text are skipped.
pub fn format_spans<T>(
    text: &str,
    tokens: &TokenStore<T>,
    encoding: OffsetEncoding,
) -> Vec<FormatSpan> {
    let text_len = char_len(text);
    tokens
        .iter()
        .filter(|t| t.end() <= text_len)
        .map(|t| FormatSpan {
            start: encoding.from_chars(text, t.start),
            end: encoding.from_chars(text, t.end()),
            format: t.format,
        })
        .collect()
}
