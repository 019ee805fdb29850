//! Controller configuration.

use crate::error::ConfigError;
use crate::text::OffsetEncoding;
use serde::{Deserialize, Serialize};

/// Default cap for the suggestion list height, in host layout units.
pub const DEFAULT_MAX_SUGGESTION_HEIGHT: f64 = 200.0;

/// Configuration for a [`SuggestingBox`](crate::SuggestingBox).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestingBoxConfig {
    /// Characters that open a suggestion query (e.g. `"#@"`).
    pub prefixes: String,
    /// Unit of offsets exchanged with the platform adapter.
    pub offset_encoding: OffsetEncoding,
    /// When the caret is pushed rightward out of a token, also skip the token's trailing space.
    pub skip_trailing_space: bool,
    /// Upper bound for [`SuggestingBox::suggestion_list_height`](crate::SuggestingBox::suggestion_list_height).
    pub max_suggestion_height: f64,
}

impl Default for SuggestingBoxConfig {
    fn default() -> Self {
        Self {
            prefixes: String::new(),
            offset_encoding: OffsetEncoding::Chars,
            skip_trailing_space: true,
            max_suggestion_height: DEFAULT_MAX_SUGGESTION_HEIGHT,
        }
    }
}

impl SuggestingBoxConfig {
    /// Create a config with the given prefix characters and defaults for the rest.
    pub fn new(prefixes: impl Into<String>) -> Self {
        Self {
            prefixes: prefixes.into(),
            ..Self::default()
        }
    }

    /// Set the host offset unit.
    pub fn with_offset_encoding(mut self, encoding: OffsetEncoding) -> Self {
        self.offset_encoding = encoding;
        self
    }

    /// Set whether rightward caret snapping skips a trailing space.
    pub fn with_skip_trailing_space(mut self, skip: bool) -> Self {
        self.skip_trailing_space = skip;
        self
    }

    /// Set the suggestion list height cap.
    pub fn with_max_suggestion_height(mut self, height: f64) -> Self {
        self.max_suggestion_height = height;
        self
    }

    /// Parse and validate a JSON configuration document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every prefix can open a trigger and the height cap is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ch) = self
            .prefixes
            .chars()
            .find(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ConfigError::InvalidPrefix(ch));
        }
        if !self.max_suggestion_height.is_finite() || self.max_suggestion_height < 0.0 {
            return Err(ConfigError::InvalidMaxHeight(self.max_suggestion_height));
        }
        Ok(())
    }

    /// Prefix characters, deduplicated, in declaration order.
    pub fn prefix_chars(&self) -> Vec<char> {
        let mut chars: Vec<char> = Vec::with_capacity(self.prefixes.len());
        for ch in self.prefixes.chars() {
            if !chars.contains(&ch) {
                chars.push(ch);
            }
        }
        chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SuggestingBoxConfig::default();
        assert!(config.prefixes.is_empty());
        assert!(config.skip_trailing_space);
        assert_eq!(config.max_suggestion_height, DEFAULT_MAX_SUGGESTION_HEIGHT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config =
            SuggestingBoxConfig::from_json_str(r##"{"prefixes":"#@","offset_encoding":"utf16"}"##)
                .unwrap();
        assert_eq!(config.prefix_chars(), vec!['#', '@']);
        assert_eq!(config.offset_encoding, OffsetEncoding::Utf16);
        assert!(config.skip_trailing_space);
    }

    #[test]
    fn test_whitespace_prefix_is_rejected() {
        let err = SuggestingBoxConfig::new("# ").validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrefix(' ')));
    }

    #[test]
    fn test_bad_height_is_rejected() {
        let err = SuggestingBoxConfig::new("#")
            .with_max_suggestion_height(f64::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxHeight(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SuggestingBoxConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_prefix_chars_deduplicates() {
        assert_eq!(SuggestingBoxConfig::new("##@").prefix_chars(), vec!['#', '@']);
    }
}
