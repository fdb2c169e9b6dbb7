//! JSON rendering for slide decks.

use crate::error::Result;
use crate::model::SlideDeck;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a deck to JSON.
pub fn to_json(deck: &SlideDeck, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(deck)?,
        JsonFormat::Compact => serde_json::to_string(deck)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_deck, ParseOptions};

    #[test]
    fn test_to_json_pretty() {
        let deck = parse_deck("# Hello\n---\n*x*", &ParseOptions::default());
        let json = to_json(&deck, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"type\": \"heading\""));
        assert!(json.contains("\"type\": \"emphasis\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact_round_trip() {
        let deck = parse_deck("- a\n- b\n\n| x |\n|:-:|", &ParseOptions::default());
        let json = to_json(&deck, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let back: SlideDeck = serde_json::from_str(&json).unwrap();
        assert_eq!(back, deck);
    }
}
