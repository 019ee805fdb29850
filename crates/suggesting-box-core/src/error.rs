//! Error types for the fallible edges of the engine.
//!
//! Editing itself never fails: every input resolves to some consistent text/token state. Errors
//! only surface when loading configuration, restoring content strictly, or (de)serializing
//! snapshots.

use thiserror::Error;

/// Invalid [`SuggestingBoxConfig`](crate::SuggestingBoxConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A prefix character that can never open a trigger (whitespace or control character).
    #[error("invalid prefix character {0:?}: prefixes must be visible, non-whitespace characters")]
    InvalidPrefix(char),
    /// The maximum suggestion list height is negative or not finite.
    #[error("invalid max suggestion height: {0}")]
    InvalidMaxHeight(f64),
    /// The configuration document failed to parse.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A token list that is inconsistent with the text it was supplied with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The token's range extends past the end of the text.
    #[error("token {index} ({start}..{end}) is out of bounds for text of length {text_len}")]
    OutOfBounds {
        /// Index of the offending token (after sorting by start).
        index: usize,
        /// Token start offset.
        start: usize,
        /// Token end offset (exclusive).
        end: usize,
        /// Text length in characters.
        text_len: usize,
    },
    /// The text at the token's range is not the token's full text.
    #[error("token {index} expects {expected:?} at {start}, found {found:?}")]
    TextMismatch {
        /// Index of the offending token (after sorting by start).
        index: usize,
        /// Token start offset.
        start: usize,
        /// `prefix + display_text`.
        expected: String,
        /// The text actually present at the token's range.
        found: String,
    },
    /// Two tokens overlap.
    #[error("token {index} starting at {start} overlaps the previous token ending at {previous_end}")]
    Overlap {
        /// Index of the later token (after sorting by start).
        index: usize,
        /// Start of the later token.
        start: usize,
        /// Exclusive end of the earlier token.
        previous_end: usize,
    },
    /// A token with neither prefix nor display text.
    #[error("token {index} at {start} is empty")]
    Empty {
        /// Index of the offending token (after sorting by start).
        index: usize,
        /// Token start offset.
        start: usize,
    },
}

/// Failure to encode or restore a [`ContentSnapshot`](crate::ContentSnapshot).
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// JSON encoding or decoding failed.
    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    /// The decoded tokens do not match the decoded text.
    #[error("snapshot content is inconsistent: {0}")]
    Content(#[from] ContentError),
}
