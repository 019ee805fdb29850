mod common;

use common::{
    assert_consistent, backspace, delete_range, record_events, replace_range, test_box, type_text,
};
use pretty_assertions::assert_eq;
use suggesting_box_core::{SuggestingBoxEvent, Token, TokenFormat};

fn tag(start: usize, display: &str) -> Token<String> {
    Token::new(start, "#", display, TokenFormat::default())
}

#[test]
fn test_hashtag_scenario() {
    let mut sbox = test_box();

    type_text(&mut sbox, "Hi ");
    type_text(&mut sbox, "#MAUI");
    assert_eq!(sbox.suggestion_state().query, "MAUI");
    assert_eq!(sbox.candidates(), ["MAUI".to_string()]);

    assert!(sbox.select_suggestion(0));
    assert_eq!(sbox.text(), "Hi #MAUI ");
    assert_eq!(sbox.cursor(), 9);

    let tokens = sbox.get_tokens();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].start, 3);
    assert_eq!(tokens[0].prefix, "#");
    assert_eq!(tokens[0].display_text, "MAUI");
    assert!(tokens[0].format.bold);
    assert_eq!(tokens[0].item.as_deref(), Some("MAUI"));
    assert_eq!(sbox.adapter().last_reset(), Some(("Hi #MAUI ", 9)));

    backspace(&mut sbox);
    assert_eq!(sbox.text(), "Hi ");
    assert_eq!(sbox.cursor(), 3);
    assert!(sbox.tokens().is_empty());
    assert!(!sbox.is_correction_pending());
}

#[test]
fn test_typing_inside_token_never_splits_it() {
    const TEXT: &str = "Hi #MAUI there";

    for position in 4..=8 {
        let mut sbox = test_box();
        sbox.set_content(TEXT, vec![tag(3, "MAUI")]);
        let events = record_events(&mut sbox);

        let mut new = TEXT.to_string();
        new.insert(position, 'x');
        sbox.on_text_changed(TEXT, &new);

        assert_eq!(sbox.text(), TEXT, "insertion at {position}");
        assert_eq!(sbox.cursor(), 9, "insertion at {position}");
        assert_eq!(sbox.tokens().len(), 1);
        assert_eq!(sbox.adapter().last_reset(), Some((TEXT, 9)));
        assert_eq!(
            events.borrow().as_slice(),
            [SuggestingBoxEvent::InsertionRejected { token_start: 3 }]
        );

        sbox.run_deferred();
        assert_consistent(&sbox);
    }
}

#[test]
fn test_whitespace_at_token_end_is_allowed() {
    let mut sbox = test_box();
    sbox.set_content("Hi #MAUI", vec![tag(3, "MAUI")]);

    sbox.on_text_changed("Hi #MAUI", "Hi #MAUI ");
    assert_eq!(sbox.text(), "Hi #MAUI ");
    assert_eq!(sbox.cursor(), 9);
    assert_eq!(sbox.tokens().as_slice()[0].start, 3);
    assert!(!sbox.is_correction_pending());
}

#[test]
fn test_typing_before_token_shifts_it() {
    let mut sbox = test_box();
    sbox.set_content("Hi #MAUI there", vec![tag(3, "MAUI")]);

    sbox.on_cursor_position_changed(0);
    type_text(&mut sbox, "Yo ");
    assert_eq!(sbox.text(), "Yo Hi #MAUI there");
    assert_eq!(sbox.tokens().as_slice()[0].start, 6);
    assert_consistent(&sbox);
}

#[test]
fn test_deleting_any_token_char_removes_whole_token() {
    for position in 3..8 {
        let mut sbox = test_box();
        sbox.set_content("Hi #MAUI there", vec![tag(3, "MAUI")]);

        delete_range(&mut sbox, position, position + 1);
        assert_eq!(sbox.text(), "Hi there", "deletion at {position}");
        assert_eq!(sbox.cursor(), 3);
        assert!(sbox.tokens().is_empty());
    }
}

#[test]
fn test_deleting_token_without_trailing_space() {
    let mut sbox = test_box();
    sbox.set_content("Hi #MAUI", vec![tag(3, "MAUI")]);

    delete_range(&mut sbox, 5, 6);
    assert_eq!(sbox.text(), "Hi ");
    assert_eq!(sbox.cursor(), 3);
}

#[test]
fn test_selection_across_tokens_removes_both() {
    let mut sbox = test_box();
    sbox.set_content("#a #b tail #c", vec![tag(0, "a"), tag(3, "b"), tag(11, "c")]);
    let events = record_events(&mut sbox);

    delete_range(&mut sbox, 1, 4);
    assert_eq!(sbox.text(), "tail #c");
    assert_eq!(sbox.cursor(), 0);
    assert_eq!(sbox.tokens().as_slice()[0].start, 5);
    assert_consistent(&sbox);

    let events = events.borrow();
    let removed = events.iter().find_map(|e| match e {
        SuggestingBoxEvent::TokensRemoved { tokens } => Some(tokens.len()),
        _ => None,
    });
    assert_eq!(removed, Some(2));
}

#[test]
fn test_deleting_next_to_token_leaves_it() {
    let mut sbox = test_box();
    sbox.set_content("ab#x yz", vec![tag(2, "x")]);

    delete_range(&mut sbox, 1, 2);
    assert_eq!(sbox.text(), "a#x yz");
    assert_eq!(sbox.tokens().as_slice()[0].start, 1);

    delete_range(&mut sbox, 4, 5);
    assert_eq!(sbox.text(), "a#x z");
    assert_eq!(sbox.tokens().len(), 1);
    assert_consistent(&sbox);
}

#[test]
fn test_paste_over_token_keeps_pasted_text() {
    let mut sbox = test_box();
    sbox.set_content("say #MAUI now", vec![tag(4, "MAUI")]);

    replace_range(&mut sbox, 4, 9, "planet");
    assert_eq!(sbox.text(), "say planet now");
    assert_eq!(sbox.cursor(), 10);
    assert!(sbox.tokens().is_empty());
}

#[test]
fn test_shrinking_replacement_over_token() {
    let mut sbox = test_box();
    sbox.set_content("a #MAUI b", vec![tag(2, "MAUI")]);

    replace_range(&mut sbox, 2, 7, "z");
    assert_eq!(sbox.text(), "a z b");
    assert_eq!(sbox.cursor(), 3);
    assert!(sbox.tokens().is_empty());
}

#[test]
fn test_equal_length_overwrite_of_token() {
    let mut sbox = test_box();
    sbox.set_content("say #MAUI now", vec![tag(4, "MAUI")]);

    replace_range(&mut sbox, 4, 9, "world");
    assert_eq!(sbox.text(), "say world now");
    assert_eq!(sbox.cursor(), 9);
    assert!(sbox.tokens().is_empty());
}

#[test]
fn test_mention_with_space_in_display_text() {
    let mut sbox = test_box();
    type_text(&mut sbox, "cc @ja");
    assert_eq!(sbox.candidates(), ["Jane Smith".to_string()]);
    assert!(sbox.select_suggestion(0));
    assert_eq!(sbox.text(), "cc @Jane Smith ");

    type_text(&mut sbox, "#ru");
    assert_eq!(sbox.suggestion_state().prefix_start, Some(15));
    assert!(sbox.select_suggestion(1));
    assert_eq!(sbox.text(), "cc @Jane Smith #RustConf ");
    assert_eq!(sbox.tokens().len(), 2);
    assert_consistent(&sbox);
}

#[test]
fn test_query_does_not_cross_lines() {
    let mut sbox = test_box();
    type_text(&mut sbox, "#ru\n");
    assert!(!sbox.suggestion_state().is_active());
}
