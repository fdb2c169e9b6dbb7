//! Visitor pattern for customizing deck rendering.
//!
//! A visitor sees each block (and each image) before the renderer emits it
//! and may keep the default markup, replace it with its own, or drop it.
//! Replacement strings are inserted verbatim, so they must already be valid
//! HTML.
//!
//! # Example
//!
//! ```
//! use mdslides::render::visitor::{DeckVisitor, VisitorAction};
//! use mdslides::model::Table;
//!
//! struct HideTables;
//!
//! impl DeckVisitor for HideTables {
//!     fn visit_table(&mut self, _table: &Table) -> VisitorAction {
//!         VisitorAction::Replace("<p>(table omitted)</p>\n".to_string())
//!     }
//! }
//! ```

use crate::model::{Inline, Table};

use super::html::escape_html;

/// Action returned by visitor methods to control rendering behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Continue with default rendering.
    #[default]
    Continue,

    /// Replace the element with custom markup.
    Replace(String),

    /// Skip this element entirely (produce no output).
    Skip,
}

impl VisitorAction {
    /// Check if this action indicates the element should be skipped.
    pub fn should_skip(&self) -> bool {
        matches!(self, VisitorAction::Skip)
    }

    /// Check if this action provides replacement content.
    pub fn is_replace(&self) -> bool {
        matches!(self, VisitorAction::Replace(_))
    }

    /// Get replacement content if available.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            VisitorAction::Replace(s) => Some(s),
            _ => None,
        }
    }
}

/// Trait for visiting deck elements during rendering.
///
/// All methods return `VisitorAction::Continue` by default.
pub trait DeckVisitor: Send {
    /// Called before rendering a heading, with its plain text.
    fn visit_heading(&mut self, level: u8, text: &str) -> VisitorAction {
        let _ = (level, text);
        VisitorAction::Continue
    }

    /// Called before rendering a paragraph.
    fn visit_paragraph(&mut self, content: &[Inline]) -> VisitorAction {
        let _ = content;
        VisitorAction::Continue
    }

    /// Called before rendering a fenced code block.
    fn visit_code_block(&mut self, language: Option<&str>, code: &str) -> VisitorAction {
        let _ = (language, code);
        VisitorAction::Continue
    }

    /// Called before rendering a table.
    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        let _ = table;
        VisitorAction::Continue
    }

    /// Called before rendering an inline image.
    fn visit_image(&mut self, src: &str, alt: &str) -> VisitorAction {
        let _ = (src, alt);
        VisitorAction::Continue
    }

    /// Called before rendering an in-slide rule.
    fn visit_rule(&mut self) -> VisitorAction {
        VisitorAction::Continue
    }

    /// Called before rendering an error node.
    fn visit_error(&mut self, raw: &str, message: &str) -> VisitorAction {
        let _ = (raw, message);
        VisitorAction::Continue
    }

    /// Called before a slide's markup is opened.
    fn on_slide_start(&mut self, index: usize) {
        let _ = index;
    }

    /// Called after a slide's markup is closed.
    fn on_slide_end(&mut self, index: usize) {
        let _ = index;
    }
}

/// Default visitor that performs no customization.
#[derive(Debug, Clone, Default)]
pub struct DefaultVisitor;

impl DefaultVisitor {
    /// Create a new default visitor.
    pub fn new() -> Self {
        Self
    }
}

impl DeckVisitor for DefaultVisitor {}

/// Visitor that drops all images.
#[derive(Debug, Clone, Default)]
pub struct SkipImagesVisitor;

impl DeckVisitor for SkipImagesVisitor {
    fn visit_image(&mut self, _src: &str, _alt: &str) -> VisitorAction {
        VisitorAction::Skip
    }
}

/// Visitor that flattens headings deeper than a maximum level.
#[derive(Debug, Clone)]
pub struct MaxHeadingDepthVisitor {
    max_level: u8,
}

impl MaxHeadingDepthVisitor {
    /// Create a visitor that limits headings to the specified max level.
    pub fn new(max_level: u8) -> Self {
        Self {
            max_level: max_level.clamp(1, 6),
        }
    }
}

impl DeckVisitor for MaxHeadingDepthVisitor {
    fn visit_heading(&mut self, level: u8, text: &str) -> VisitorAction {
        if level <= self.max_level {
            return VisitorAction::Continue;
        }
        VisitorAction::Replace(format!(
            "<h{level}>{}</h{level}>\n",
            escape_html(text),
            level = self.max_level
        ))
    }
}

/// Composite visitor that chains multiple visitors.
///
/// Visitors are called in order. The first visitor that returns
/// a non-Continue action determines the result.
pub struct CompositeVisitor {
    visitors: Vec<Box<dyn DeckVisitor>>,
}

impl CompositeVisitor {
    /// Create a new composite visitor.
    pub fn new() -> Self {
        Self {
            visitors: Vec::new(),
        }
    }

    /// Add a visitor to the chain.
    pub fn with_visitor<V: DeckVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    fn first_action(
        &mut self,
        mut visit: impl FnMut(&mut Box<dyn DeckVisitor>) -> VisitorAction,
    ) -> VisitorAction {
        for visitor in &mut self.visitors {
            let action = visit(visitor);
            if action != VisitorAction::Continue {
                return action;
            }
        }
        VisitorAction::Continue
    }
}

impl Default for CompositeVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckVisitor for CompositeVisitor {
    fn visit_heading(&mut self, level: u8, text: &str) -> VisitorAction {
        self.first_action(|v| v.visit_heading(level, text))
    }

    fn visit_paragraph(&mut self, content: &[Inline]) -> VisitorAction {
        self.first_action(|v| v.visit_paragraph(content))
    }

    fn visit_code_block(&mut self, language: Option<&str>, code: &str) -> VisitorAction {
        self.first_action(|v| v.visit_code_block(language, code))
    }

    fn visit_table(&mut self, table: &Table) -> VisitorAction {
        self.first_action(|v| v.visit_table(table))
    }

    fn visit_image(&mut self, src: &str, alt: &str) -> VisitorAction {
        self.first_action(|v| v.visit_image(src, alt))
    }

    fn visit_rule(&mut self) -> VisitorAction {
        self.first_action(|v| v.visit_rule())
    }

    fn visit_error(&mut self, raw: &str, message: &str) -> VisitorAction {
        self.first_action(|v| v.visit_error(raw, message))
    }

    fn on_slide_start(&mut self, index: usize) {
        for visitor in &mut self.visitors {
            visitor.on_slide_start(index);
        }
    }

    fn on_slide_end(&mut self, index: usize) {
        for visitor in &mut self.visitors {
            visitor.on_slide_end(index);
        }
    }
}
