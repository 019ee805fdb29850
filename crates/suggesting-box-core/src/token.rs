//! Token data model.
//!
//! A token is an atomic span of text (`prefix + display_text`, e.g. `#MAUI` or `@Jane Smith`)
//! inserted by choosing a suggestion. Apart from its start offset it never changes; edits that
//! would split it delete it whole instead.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// An RGBA color, carried through to the rendering adapter uninterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (`0` is fully transparent).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Visual attributes of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenFormat {
    /// Background color (transparent means "leave the host default").
    pub background: Rgba,
    /// Foreground color (black means "leave the host default").
    pub foreground: Rgba,
    /// Render the token in bold.
    pub bold: bool,
}

impl Default for TokenFormat {
    fn default() -> Self {
        Self {
            background: Rgba::TRANSPARENT,
            foreground: Rgba::BLACK,
            bold: false,
        }
    }
}

impl TokenFormat {
    /// `true` if rendering this format would change nothing on the host.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A token placed in the text buffer.
///
/// `T` is the originating suggestion item; it is carried for round-tripping only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token<T> {
    /// Start character offset in the current text buffer.
    pub start: usize,
    /// The trigger prefix (e.g. `"#"`).
    pub prefix: String,
    /// The text shown after the prefix.
    pub display_text: String,
    /// Visual attributes.
    #[serde(default)]
    pub format: TokenFormat,
    /// The suggestion item this token was created from.
    #[serde(default = "Option::default")]
    pub item: Option<T>,
}

impl<T> Token<T> {
    /// Create a token without an item.
    pub fn new(
        start: usize,
        prefix: impl Into<String>,
        display_text: impl Into<String>,
        format: TokenFormat,
    ) -> Self {
        Self {
            start,
            prefix: prefix.into(),
            display_text: display_text.into(),
            format,
            item: None,
        }
    }

    /// Attach the originating suggestion item.
    pub fn with_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    /// `prefix + display_text`.
    pub fn full_text(&self) -> String {
        let mut full = String::with_capacity(self.prefix.len() + self.display_text.len());
        full.push_str(&self.prefix);
        full.push_str(&self.display_text);
        full
    }

    /// Length of [`full_text`](Self::full_text) in characters.
    pub fn len(&self) -> usize {
        self.prefix.chars().count() + self.display_text.chars().count()
    }

    /// `true` if the token has no text at all.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.display_text.is_empty()
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.start + self.len()
    }

    /// Half-open range `start..end`.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// `start <= pos < end`
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end()
    }

    /// `start < pos < end`: a cursor here would sit inside the token.
    pub fn contains_interior(&self, pos: usize) -> bool {
        self.start < pos && pos < self.end()
    }

    /// `true` if the token overlaps the half-open `range`.
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        self.start < range.end && self.end() > range.start
    }

    /// Move the token by `delta` characters, saturating at zero.
    pub(crate) fn shift(&mut self, delta: isize) {
        self.start = self.start.saturating_add_signed(delta);
    }
}
