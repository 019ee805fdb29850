//! Keeps the caret out of token interiors.
//!
//! When the host moves the cursor strictly inside a token (by click, arrow key, or IME), the
//! cursor is pushed to the nearest boundary in the direction of travel.

use crate::text::{char_at, char_len};
use crate::token_store::TokenStore;

/// Direction the cursor travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorDirection {
    /// Toward the start of the text.
    Left,
    /// Toward the end of the text (or stationary).
    Right,
}

impl CursorDirection {
    /// Infer direction from the previously observed position.
    ///
    /// An unknown previous position is treated as moving left.
    pub fn infer(previous: Option<usize>, current: usize) -> Self {
        match previous {
            Some(previous) if previous <= current => Self::Right,
            _ => Self::Left,
        }
    }
}

/// Compute where the cursor must go if `current` lies strictly inside a token.
///
/// Returns `None` if the cursor is already at an allowed position. Moving left snaps to the
/// token start; moving right snaps to the token end, and one further past a trailing space when
/// `skip_trailing_space` is set.
pub fn relocate_cursor<T>(
    text: &str,
    tokens: &TokenStore<T>,
    previous: Option<usize>,
    current: usize,
    skip_trailing_space: bool,
) -> Option<usize> {
    let token = tokens.token_around(current)?;

    let target = match CursorDirection::infer(previous, current) {
        CursorDirection::Left => token.start,
        CursorDirection::Right => {
            let end = token.end();
            if skip_trailing_space && char_at(text, end) == Some(' ') {
                end + 1
            } else {
                end
            }
        }
    };

    Some(target.min(char_len(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Token, TokenFormat};

    const TEXT: &str = "Hi #MAUI there";

    fn tokens() -> TokenStore<()> {
        TokenStore::from_tokens(vec![Token::new(3, "#", "MAUI", TokenFormat::default())])
    }

    #[test]
    fn test_direction_inference() {
        assert_eq!(CursorDirection::infer(None, 4), CursorDirection::Left);
        assert_eq!(CursorDirection::infer(Some(9), 4), CursorDirection::Left);
        assert_eq!(CursorDirection::infer(Some(3), 4), CursorDirection::Right);
        assert_eq!(CursorDirection::infer(Some(4), 4), CursorDirection::Right);
    }

    #[test]
    fn test_moving_left_snaps_to_start() {
        assert_eq!(relocate_cursor(TEXT, &tokens(), Some(8), 7, true), Some(3));
    }

    #[test]
    fn test_moving_right_snaps_past_trailing_space() {
        assert_eq!(relocate_cursor(TEXT, &tokens(), Some(3), 4, true), Some(9));
        assert_eq!(relocate_cursor(TEXT, &tokens(), Some(3), 4, false), Some(8));
    }

    #[test]
    fn test_unknown_previous_snaps_backward() {
        assert_eq!(relocate_cursor(TEXT, &tokens(), None, 5, true), Some(3));
    }

    #[test]
    fn test_boundaries_are_left_alone() {
        assert_eq!(relocate_cursor(TEXT, &tokens(), Some(0), 3, true), None);
        assert_eq!(relocate_cursor(TEXT, &tokens(), Some(0), 8, true), None);
        assert_eq!(relocate_cursor(TEXT, &tokens(), Some(0), 11, true), None);
    }
}
