//! Rendering result with diagnostics and statistics.

use serde::{Deserialize, Serialize};

use crate::model::{Block, Diagnostic, Inline, SlideDeck};

/// Result of rendering a deck, including markup and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered HTML fragment
    pub html: String,

    /// Diagnostics for error nodes in the deck
    pub diagnostics: Vec<Diagnostic>,

    /// Deck statistics
    pub stats: DeckStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(html: String, diagnostics: Vec<Diagnostic>, stats: DeckStats) -> Self {
        Self {
            html,
            diagnostics,
            stats,
        }
    }

    /// Get the markup length in bytes.
    pub fn content_len(&self) -> usize {
        self.html.len()
    }

    /// Check if any diagnostics were reported.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Counts of what a deck contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStats {
    /// Number of slides
    pub slide_count: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of lists (nested lists included)
    pub list_count: u32,

    /// Number of list items
    pub list_item_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of fenced code blocks
    pub code_block_count: u32,

    /// Number of images
    pub image_count: u32,

    /// Number of links
    pub link_count: u32,

    /// Number of error nodes
    pub error_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,
}

impl DeckStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics for a whole deck.
    pub fn from_deck(deck: &SlideDeck) -> Self {
        let mut stats = Self::new();
        for slide in &deck.slides {
            stats.slide_count += 1;
            stats.count_blocks(&slide.blocks);
        }
        stats.word_count = deck.plain_text().split_whitespace().count() as u32;
        stats
    }

    /// Check if the deck has any error nodes.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    fn count_blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            match block {
                Block::Heading { content, .. } => {
                    self.heading_count += 1;
                    self.count_inlines(content);
                }
                Block::Paragraph { content } => {
                    self.paragraph_count += 1;
                    self.count_inlines(content);
                }
                Block::List(list) => {
                    self.list_count += 1;
                    for item in &list.items {
                        self.list_item_count += 1;
                        self.count_blocks(&item.children);
                    }
                }
                Block::CodeBlock { .. } => self.code_block_count += 1,
                Block::Blockquote { children } => self.count_blocks(children),
                Block::Table(table) => {
                    self.table_count += 1;
                    for row in std::iter::once(&table.header).chain(&table.rows) {
                        for cell in &row.cells {
                            self.count_inlines(&cell.content);
                        }
                    }
                }
                Block::ThematicRule => {}
                Block::Error { .. } => self.error_count += 1,
            }
        }
    }

    fn count_inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            match inline {
                Inline::Image { .. } => self.image_count += 1,
                Inline::Link { children, .. } => {
                    self.link_count += 1;
                    self.count_inlines(children);
                }
                Inline::Emphasis { children } | Inline::Strong { children } => {
                    self.count_inlines(children)
                }
                _ => {}
            }
        }
    }
}
