#![warn(missing_docs)]
//! Suggesting Box Core - Headless Token-Aware Text Field Engine
//!
//! # Overview
//!
//! `suggesting-box-core` implements the logic behind a text field that accepts atomic "tokens"
//! (`#hashtag`, `@mention`) picked from a suggestion list opened by a prefix character.
//! It does not render anything: the host text control reports raw before/after text snapshots
//! and caret moves, and the engine answers through a [`PlatformAdapter`].
//!
//! # Core Features
//!
//! - **Snapshot Diffing**: common prefix/suffix scan locates the single edited region
//! - **Atomic Tokens**: typing inside a token is rejected; deleting any part deletes it whole
//! - **Trigger Detection**: backward scan from the caret honoring token and word boundaries
//! - **Caret Guard**: the caret never rests inside a token
//! - **Deferred Reconciliation**: corrections re-applied on the next tick, invalidated by
//!   generation stamps
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  SuggestingBox (controller, events)         │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Deferred Queue & Platform Adapter          │  ← Host Boundary
//! ├─────────────────────────────────────────────┤
//! │  Deletion Guard / Trigger / Caret Guard     │  ← Token Rules
//! ├─────────────────────────────────────────────┤
//! │  Token Store                                │  ← Token Positions
//! ├─────────────────────────────────────────────┤
//! │  Diff & Char-Offset Helpers                 │  ← Text Primitives
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use suggesting_box_core::{
//!     FnSuggestionSource, NullAdapter, SuggestingBox, SuggestingBoxConfig, SuggestionChoice,
//! };
//!
//! let mut sbox = SuggestingBox::new(SuggestingBoxConfig::new("#@"), NullAdapter::default())
//!     .unwrap()
//!     .with_source(FnSuggestionSource::new(
//!         |_prefix, _query: &str| vec!["MAUI".to_string()],
//!         |_prefix, item: &String| SuggestionChoice::new(item.clone()),
//!     ));
//!
//! sbox.on_text_changed("Hi ", "Hi #MA");
//! sbox.select_suggestion(0);
//! assert_eq!(sbox.text(), "Hi #MAUI ");
//!
//! // Backspace removes the whole token and its trailing space.
//! sbox.on_text_changed("Hi #MAUI ", "Hi #MAUI");
//! assert_eq!(sbox.text(), "Hi ");
//! assert_eq!(sbox.cursor(), 3);
//! sbox.run_deferred();
//! ```
//!
//! # Module Description
//!
//! - [`text`] - Character offset helpers and host offset encodings
//! - [`diff`] - Edit region detection between text snapshots
//! - [`token`] / [`token_store`] - Token records and their ordered store
//! - [`deletion_guard`] - Atomic token protection for raw edits
//! - [`trigger`] - Suggestion trigger detection
//! - [`cursor_guard`] - Caret relocation out of token interiors
//! - [`suggestion`] - Suggestion state, sources, and token insertion
//! - [`adapter`] - Platform capability interface
//! - [`dispatch`] - Deferred work queue
//! - [`controller`] - The [`SuggestingBox`] controller

pub mod adapter;
pub mod config;
pub mod controller;
pub mod cursor_guard;
pub mod deletion_guard;
pub mod diff;
pub mod dispatch;
pub mod error;
pub mod snapshot;
pub mod suggestion;
pub mod text;
pub mod token;
pub mod token_store;
pub mod trigger;

pub use adapter::{FormatSpan, NullAdapter, PlatformAdapter, SubscriptionHandle, format_spans};
pub use config::{DEFAULT_MAX_SUGGESTION_HEIGHT, SuggestingBoxConfig};
pub use controller::{EventCallback, SuggestingBox, SuggestingBoxEvent};
pub use cursor_guard::{CursorDirection, relocate_cursor};
pub use deletion_guard::{CorrectionKind, TokenCorrection, guard_token_edit};
pub use diff::{DeletionRegion, EditRegion, find_deletion_region, find_edit_region};
pub use dispatch::{DeferredQueue, DeferredTask};
pub use error::{ConfigError, ContentError, SnapshotError};
pub use snapshot::ContentSnapshot;
pub use suggestion::{
    FnSuggestionSource, SuggestionChoice, SuggestionSource, SuggestionState, TokenInsertion,
    insert_token,
};
pub use text::OffsetEncoding;
pub use token::{Rgba, Token, TokenFormat};
pub use token_store::{TokenStore, validate_tokens};
pub use trigger::{Trigger, detect_trigger};
