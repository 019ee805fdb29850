//! Hashtag example
//!
//! Drives a `SuggestingBox` the way a host text control would, printing what a console "widget"
//! is asked to do.

use suggesting_box_core::{
    FnSuggestionSource, FormatSpan, PlatformAdapter, Rgba, SubscriptionHandle, SuggestingBox,
    SuggestingBoxConfig, SuggestingBoxEvent, SuggestionChoice, TokenFormat,
};

#[derive(Default)]
struct ConsoleAdapter {
    next_handle: u64,
}

impl PlatformAdapter for ConsoleAdapter {
    fn apply_formatting(&mut self, text: &str, spans: &[FormatSpan]) {
        println!("  [host] format {text:?}: {} span(s)", spans.len());
        for span in spans {
            println!(
                "         {}..{} bold={} background={:?}",
                span.start, span.end, span.format.bold, span.format.background
            );
        }
    }

    fn reset_text(&mut self, text: &str, cursor: usize) {
        println!("  [host] reset text to {text:?}, caret {cursor}");
    }

    fn set_cursor(&mut self, cursor: usize) {
        println!("  [host] move caret to {cursor}");
    }

    fn subscribe_cursor(&mut self) -> SubscriptionHandle {
        self.next_handle += 1;
        SubscriptionHandle(self.next_handle)
    }

    fn subscribe_paste(&mut self) -> SubscriptionHandle {
        self.next_handle += 1;
        SubscriptionHandle(self.next_handle)
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        println!("  [host] unsubscribe {handle:?}");
    }
}

const TAGS: &[&str] = &["MAUI", "dotnet", "Rust", "RustConf"];

fn main() {
    println!("=== Hashtag suggestions ===\n");

    let config = SuggestingBoxConfig::new("#");
    let mut sbox = match SuggestingBox::new(config, ConsoleAdapter::default()) {
        Ok(sbox) => sbox,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return;
        }
    };
    sbox.set_source(FnSuggestionSource::new(
        |_prefix, query: &str| {
            TAGS.iter()
                .filter(|tag| tag.to_lowercase().starts_with(&query.to_lowercase()))
                .map(|tag| tag.to_string())
                .collect()
        },
        |_prefix, item: &String| {
            SuggestionChoice::new(item.clone()).with_format(TokenFormat {
                background: Rgba::rgb(119, 136, 153),
                foreground: Rgba::WHITE,
                bold: true,
            })
        },
    ));
    sbox.subscribe(|event: &SuggestingBoxEvent<String>| println!("  [event] {event:?}"));
    sbox.attach();

    println!("1. Type \"Hi #MA\":");
    let mut text = String::new();
    for ch in "Hi #MA".chars() {
        let old = text.clone();
        text.push(ch);
        sbox.on_text_changed(&old, &text);
        sbox.run_deferred();
    }
    println!("  candidates: {:?}", sbox.candidates());

    println!("\n2. Pick the first candidate:");
    sbox.select_suggestion(0);
    sbox.run_deferred();
    println!("  text {:?}, caret {}", sbox.text(), sbox.cursor());

    println!("\n3. Click inside the token:");
    sbox.on_native_cursor_moved(Some(9), 5);
    sbox.run_deferred();
    println!("  caret {}", sbox.cursor());

    println!("\n4. Backspace from the end:");
    sbox.on_cursor_position_changed(9);
    sbox.on_text_changed("Hi #MAUI ", "Hi #MAUI");
    sbox.run_deferred();
    println!("  text {:?}, caret {}", sbox.text(), sbox.cursor());

    println!("\n5. Persist and restore:");
    sbox.set_content("Loving #Rust today", Vec::new());
    match sbox.snapshot().to_json() {
        Ok(json) => println!("  {json}"),
        Err(err) => eprintln!("  snapshot failed: {err}"),
    }

    sbox.detach();
}
