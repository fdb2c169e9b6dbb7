//! Plain text rendering for slide decks.

use crate::model::SlideDeck;

/// Convert a deck to a plain text outline, one section per slide.
pub fn to_text(deck: &SlideDeck) -> String {
    let mut output = String::new();
    for slide in &deck.slides {
        if !output.is_empty() {
            output.push_str("\n\n");
        }
        output.push_str(&format!("--- slide {} ---\n", slide.index + 1));
        output.push_str(&slide.plain_text());
    }
    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_deck, ParseOptions};

    #[test]
    fn test_to_text() {
        let deck = parse_deck(
            "# Hello, **world**!\n\nSecond paragraph.\n---\n- a\n- b",
            &ParseOptions::default(),
        );
        let text = to_text(&deck);

        assert!(text.starts_with("--- slide 1 ---\nHello, world!\n\nSecond paragraph."));
        assert!(text.ends_with("--- slide 2 ---\na\nb"));
    }

    #[test]
    fn test_empty_slide() {
        let deck = parse_deck("", &ParseOptions::default());
        assert_eq!(to_text(&deck), "--- slide 1 ---");
    }
}
