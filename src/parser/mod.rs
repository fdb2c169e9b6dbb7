//! Markdown parsing: document text to a [`SlideDeck`].
//!
//! The pipeline is sanitize, split, block parse, inline parse, assemble.
//! Every stage is total; malformed input becomes error nodes in the tree.

mod assembler;
mod block;
mod inline;
mod normalize;
mod options;
mod splitter;

pub use assembler::{assemble, assemble_parallel};
pub use block::parse_blocks;
pub use inline::parse_inline;
pub use normalize::normalize_source;
pub use options::{ParseOptions, DEFAULT_MAX_NESTING_DEPTH, DEFAULT_TAB_WIDTH};
pub use splitter::{split, split_with_options};

use crate::model::SlideDeck;

/// Below this many slides the thread-pool handoff costs more than it saves.
const PARALLEL_THRESHOLD: usize = 8;

/// Parse a whole document into a slide deck.
pub fn parse_deck(text: &str, options: &ParseOptions) -> SlideDeck {
    let source = normalize_source(text, options);
    let raw = split_with_options(&source, options);
    let parse = |slide: &str| parse_blocks(slide, options);

    if options.parallel && raw.len() >= PARALLEL_THRESHOLD {
        assemble_parallel(raw, parse)
    } else {
        assemble(raw, parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    #[test]
    fn test_parse_deck() {
        let deck = parse_deck("# One\r\n---\r\n# Two", &ParseOptions::default());
        assert_eq!(deck.slide_count(), 2);
        assert_eq!(deck.slides[1].blocks, vec![Block::heading(1, "Two")]);
    }

    #[test]
    fn test_fenced_separator_stays_in_slide() {
        let deck = parse_deck("```\n---\n```", &ParseOptions::default());
        assert_eq!(deck.slide_count(), 1);
        assert_eq!(
            deck.slides[0].blocks,
            vec![Block::CodeBlock {
                language: None,
                code: "---\n".into()
            }]
        );
    }

    #[test]
    fn test_diagnostic_lines_are_absolute() {
        let deck = parse_deck("# A\n---\n# B\n\n```\nnever closed", &ParseOptions::default());
        let diagnostics = deck.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].slide, 1);
        assert_eq!(diagnostics[0].line, 5);
    }
}
