//! Persistable content snapshots.

use crate::error::SnapshotError;
use crate::token::Token;
use crate::token_store::validate_tokens;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Text plus its tokens, as returned by
/// [`SuggestingBox::snapshot`](crate::SuggestingBox::snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSnapshot<T> {
    /// Full text.
    pub text: String,
    /// Tokens in ascending start order.
    #[serde(default = "Vec::new")]
    pub tokens: Vec<Token<T>>,
}

impl<T> ContentSnapshot<T> {
    /// Create a snapshot.
    pub fn new(text: impl Into<String>, tokens: Vec<Token<T>>) -> Self {
        Self {
            text: text.into(),
            tokens,
        }
    }
}

impl<T: Serialize> ContentSnapshot<T> {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<T: DeserializeOwned> ContentSnapshot<T> {
    /// Decode from JSON and check the tokens against the text.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let mut snapshot: Self = serde_json::from_str(json)?;
        snapshot.tokens.sort_by_key(|t| t.start);
        validate_tokens(&snapshot.text, &snapshot.tokens)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentError;
    use crate::token::TokenFormat;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_round_trip() {
        let snapshot = ContentSnapshot::new(
            "Hi #MAUI ",
            vec![Token::new(3, "#", "MAUI", TokenFormat::default()).with_item(7u32)],
        );
        let json = snapshot.to_json().unwrap();
        let decoded = ContentSnapshot::<u32>::from_json(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_missing_tokens_default_to_empty() {
        let decoded = ContentSnapshot::<()>::from_json(r#"{"text":"plain"}"#).unwrap();
        assert!(decoded.tokens.is_empty());
    }

    #[test]
    fn test_inconsistent_snapshot_is_rejected() {
        let json = r##"{"text":"Hi #MAUX ","tokens":[{"start":3,"prefix":"#","display_text":"MAUI"}]}"##;
        let err = ContentSnapshot::<()>::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Content(ContentError::TextMismatch { start: 3, .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            ContentSnapshot::<()>::from_json("[1,"),
            Err(SnapshotError::Json(_))
        ));
    }
}
