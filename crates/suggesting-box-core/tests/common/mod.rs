//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use suggesting_box_core::{
    FnSuggestionSource, FormatSpan, PlatformAdapter, SubscriptionHandle, SuggestingBox,
    SuggestingBoxConfig, SuggestingBoxEvent, SuggestionChoice, TokenFormat, text,
};
use tracing_subscriber::EnvFilter;

/// Host calls recorded by [`RecordingAdapter`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Format { text: String, spans: Vec<FormatSpan> },
    ResetText { text: String, cursor: usize },
    SetCursor(usize),
    Subscribe(SubscriptionHandle),
    Unsubscribe(SubscriptionHandle),
}

/// Adapter that records every call instead of driving a widget.
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    pub calls: Vec<HostCall>,
    pub deferred_requests: usize,
    pub content_height: f64,
    next_handle: u64,
}

impl RecordingAdapter {
    pub fn last_reset(&self) -> Option<(&str, usize)> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::ResetText { text, cursor } => Some((text.as_str(), *cursor)),
            _ => None,
        })
    }

    pub fn last_formatting(&self) -> Option<&[FormatSpan]> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::Format { spans, .. } => Some(spans.as_slice()),
            _ => None,
        })
    }

    pub fn cursor_moves(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::SetCursor(cursor) => Some(*cursor),
                _ => None,
            })
            .collect()
    }

    fn next(&mut self) -> SubscriptionHandle {
        self.next_handle += 1;
        let handle = SubscriptionHandle(self.next_handle);
        self.calls.push(HostCall::Subscribe(handle));
        handle
    }
}

impl PlatformAdapter for RecordingAdapter {
    fn apply_formatting(&mut self, text: &str, spans: &[FormatSpan]) {
        self.calls.push(HostCall::Format {
            text: text.to_string(),
            spans: spans.to_vec(),
        });
    }

    fn reset_text(&mut self, text: &str, cursor: usize) {
        self.calls.push(HostCall::ResetText {
            text: text.to_string(),
            cursor,
        });
    }

    fn set_cursor(&mut self, cursor: usize) {
        self.calls.push(HostCall::SetCursor(cursor));
    }

    fn measure_content_height(&self) -> f64 {
        self.content_height
    }

    fn subscribe_cursor(&mut self) -> SubscriptionHandle {
        self.next()
    }

    fn subscribe_paste(&mut self) -> SubscriptionHandle {
        self.next()
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.calls.push(HostCall::Unsubscribe(handle));
    }

    fn request_deferred_run(&mut self) {
        self.deferred_requests += 1;
    }
}

pub type TestBox = SuggestingBox<String, RecordingAdapter>;

pub const TAGS: &[&str] = &["MAUI", "Rust", "RustConf", "dotnet"];
pub const PEOPLE: &[&str] = &["Jane Smith", "John Doe"];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// A box with `#` tags and `@` people, bold formatting for tags.
pub fn test_box() -> TestBox {
    test_box_with(SuggestingBoxConfig::new("#@"))
}

pub fn test_box_with(config: SuggestingBoxConfig) -> TestBox {
    init_tracing();
    SuggestingBox::new(config, RecordingAdapter::default())
        .expect("valid config")
        .with_source(FnSuggestionSource::new(
            |prefix, query: &str| {
                let pool = if prefix == '@' { PEOPLE } else { TAGS };
                pool.iter()
                    .filter(|c| c.to_lowercase().starts_with(&query.to_lowercase()))
                    .map(|c| c.to_string())
                    .collect()
            },
            |prefix, item: &String| {
                let choice = SuggestionChoice::new(item.clone());
                if prefix == '#' {
                    choice.with_format(TokenFormat {
                        bold: true,
                        ..TokenFormat::default()
                    })
                } else {
                    choice
                }
            },
        ))
}

pub type EventLog = Rc<RefCell<Vec<SuggestingBoxEvent<String>>>>;

/// Collect every event raised by `sbox`.
pub fn record_events(sbox: &mut TestBox) -> EventLog {
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    sbox.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

/// Type `input` one character at a time at the cursor, running deferred work after each key.
pub fn type_text(sbox: &mut TestBox, input: &str) {
    for ch in input.chars() {
        let old = sbox.text().to_string();
        let mut new = old.clone();
        new.insert(text::char_to_byte(&old, sbox.cursor()), ch);
        sbox.on_text_changed(&old, &new);
        sbox.run_deferred();
    }
}

/// Delete the character before the cursor.
pub fn backspace(sbox: &mut TestBox) {
    let cursor = sbox.cursor();
    if cursor == 0 {
        return;
    }
    delete_range(sbox, cursor - 1, cursor);
}

/// Delete the characters in `start..end` as one edit.
pub fn delete_range(sbox: &mut TestBox, start: usize, end: usize) {
    replace_range(sbox, start, end, "");
}

/// Replace the characters in `start..end` with `replacement` as one edit.
pub fn replace_range(sbox: &mut TestBox, start: usize, end: usize, replacement: &str) {
    let old = sbox.text().to_string();
    let mut new = old.clone();
    new.replace_range(
        text::char_to_byte(&old, start)..text::char_to_byte(&old, end),
        replacement,
    );
    sbox.on_text_changed(&old, &new);
    sbox.run_deferred();
}

/// Check the committed token invariants.
pub fn assert_consistent(sbox: &TestBox) {
    if let Err(err) = sbox.tokens().validate(sbox.text()) {
        panic!("inconsistent state for {:?}: {err}", sbox.text());
    }
    assert!(sbox.cursor() <= text::char_len(sbox.text()));
}
