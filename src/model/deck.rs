//! Deck-level types.

use super::block::blocks_plain_text;
use super::Block;
use serde::{Deserialize, Serialize};

/// Raw text belonging to one slide, before parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSlide {
    /// 1-indexed document line of the first line of `source`
    pub start_line: usize,

    /// Slide text without the surrounding separators
    pub source: String,
}

impl RawSlide {
    /// Create a raw slide.
    pub fn new(start_line: usize, source: impl Into<String>) -> Self {
        Self {
            start_line,
            source: source.into(),
        }
    }

    /// Check if the slide text has no visible content.
    pub fn is_blank(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// An ordered, parsed slide deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDeck {
    /// Slides in document order
    pub slides: Vec<Slide>,
}

impl SlideDeck {
    /// Create a new empty deck.
    pub fn new() -> Self {
        Self { slides: Vec::new() }
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Get a slide by its 0-based index.
    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Check if the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Collect a diagnostic for every error node in the deck.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for slide in &self.slides {
            collect_diagnostics(&slide.blocks, slide, &mut out);
        }
        out
    }

    /// Get plain text content of the entire deck.
    pub fn plain_text(&self) -> String {
        self.slides
            .iter()
            .map(|slide| slide.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn collect_diagnostics(blocks: &[Block], slide: &Slide, out: &mut Vec<Diagnostic>) {
    for block in blocks {
        match block {
            Block::Error { message, line, .. } => out.push(Diagnostic {
                line: slide.start_line + line.saturating_sub(1),
                slide: slide.index,
                message: message.clone(),
            }),
            Block::Blockquote { children } => collect_diagnostics(children, slide, out),
            Block::List(list) => {
                for item in &list.items {
                    collect_diagnostics(&item.children, slide, out);
                }
            }
            _ => {}
        }
    }
}

/// A single slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// 0-based position in the deck
    pub index: usize,

    /// 1-indexed document line where the slide text starts
    pub start_line: usize,

    /// Top-level blocks of the slide
    pub blocks: Vec<Block>,
}

impl Slide {
    /// Create a slide.
    pub fn new(index: usize, start_line: usize, blocks: Vec<Block>) -> Self {
        Self {
            index,
            start_line,
            blocks,
        }
    }

    /// Check if the slide has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text content of the slide.
    pub fn plain_text(&self) -> String {
        blocks_plain_text(&self.blocks)
    }

    /// Text of the first heading on the slide, if any.
    pub fn title(&self) -> Option<String> {
        self.blocks.iter().find_map(|b| match b {
            Block::Heading { .. } => Some(b.plain_text()),
            _ => None,
        })
    }
}

/// A problem found while compiling, reported next to the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-indexed document line
    pub line: usize,

    /// 0-based slide index
    pub slide: usize,

    /// Human-readable message
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{List, ListItem};

    #[test]
    fn test_deck_new() {
        let deck = SlideDeck::new();
        assert!(deck.is_empty());
        assert_eq!(deck.slide_count(), 0);
    }

    #[test]
    fn test_diagnostics_use_document_lines() {
        let mut list = List::bullet();
        list.items.push(ListItem::new(vec![Block::error(
            "```",
            "unclosed code fence",
            2,
        )]));
        let deck = SlideDeck {
            slides: vec![
                Slide::new(0, 1, vec![Block::paragraph("intro")]),
                Slide::new(
                    1,
                    5,
                    vec![
                        Block::error("| a |\n| x |", "invalid table delimiter row", 1),
                        Block::List(list),
                    ],
                ),
            ],
        };

        let diagnostics = deck.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line, 5);
        assert_eq!(diagnostics[0].slide, 1);
        assert_eq!(diagnostics[1].line, 6);
        assert_eq!(diagnostics[1].message, "unclosed code fence");
    }

    #[test]
    fn test_slide_title() {
        let slide = Slide::new(0, 1, vec![Block::paragraph("x"), Block::heading(2, "Agenda")]);
        assert_eq!(slide.title().as_deref(), Some("Agenda"));
    }
}
