//! Block-level content nodes.

use super::inline::plain_text_of;
use super::{Inline, Table};
use serde::{Deserialize, Serialize};

/// A block-level node inside a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// ATX heading
    Heading {
        /// Heading level (1-6)
        level: u8,
        /// Heading content
        content: Vec<Inline>,
    },

    /// A paragraph of text
    Paragraph {
        /// Paragraph content
        content: Vec<Inline>,
    },

    /// An ordered or unordered list
    List(List),

    /// A fenced code block, kept literally
    CodeBlock {
        /// Language hint from the fence info string
        language: Option<String>,
        /// Literal code text
        code: String,
    },

    /// A blockquote
    Blockquote {
        /// Quoted blocks
        children: Vec<Block>,
    },

    /// A pipe table
    Table(Table),

    /// An in-slide horizontal rule
    ThematicRule,

    /// Source the parser could not interpret
    Error {
        /// Raw source lines
        raw: String,
        /// Diagnostic message
        message: String,
        /// 1-indexed line within the slide where the construct starts
        line: usize,
    },
}

impl Block {
    /// Create a paragraph with plain text.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            content: vec![Inline::text(text)],
        }
    }

    /// Create a heading with plain text.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level: level.clamp(1, 6),
            content: vec![Inline::text(text)],
        }
    }

    /// Create an error node.
    pub fn error(raw: impl Into<String>, message: impl Into<String>, line: usize) -> Self {
        Block::Error {
            raw: raw.into(),
            message: message.into(),
            line,
        }
    }

    /// Check if this block is an error node.
    pub fn is_error(&self) -> bool {
        matches!(self, Block::Error { .. })
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { content, .. } | Block::Paragraph { content } => {
                plain_text_of(content)
            }
            Block::List(list) => list.plain_text(),
            Block::CodeBlock { code, .. } => code.clone(),
            Block::Blockquote { children } => blocks_plain_text(children),
            Block::Table(table) => table.plain_text(),
            Block::ThematicRule => String::new(),
            Block::Error { raw, .. } => raw.clone(),
        }
    }
}

/// Plain text of a block sequence, one block per paragraph.
pub(crate) fn blocks_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A list of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// Whether the list is numbered
    pub ordered: bool,

    /// Starting number for ordered lists (1 for bullet lists)
    pub start: u32,

    /// Tight lists render item paragraphs without paragraph wrappers
    pub tight: bool,

    /// List items
    pub items: Vec<ListItem>,
}

impl List {
    /// Create an empty bullet list.
    pub fn bullet() -> Self {
        Self {
            ordered: false,
            start: 1,
            tight: true,
            items: Vec::new(),
        }
    }

    /// Create an empty numbered list.
    pub fn numbered(start: u32) -> Self {
        Self {
            ordered: true,
            start,
            tight: true,
            items: Vec::new(),
        }
    }

    /// Get plain text of all items, one per line.
    pub fn plain_text(&self) -> String {
        self.items
            .iter()
            .map(|item| blocks_plain_text(&item.children))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single list item holding block content (possibly nested lists).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Blocks inside the item
    pub children: Vec<Block>,
}

impl ListItem {
    /// Create an item from blocks.
    pub fn new(children: Vec<Block>) -> Self {
        Self { children }
    }

    /// Find the first nested list in this item.
    pub fn nested_list(&self) -> Option<&List> {
        self.children.iter().find_map(|b| match b {
            Block::List(list) => Some(list),
            _ => None,
        })
    }
}
