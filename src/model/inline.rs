//! Inline-level content nodes.

use serde::{Deserialize, Serialize};

/// Inline content inside a heading, paragraph or table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    /// Literal text (unescaped; escaping happens at render time)
    Text {
        /// The text content
        text: String,
    },

    /// Emphasized content (`*x*` or `_x_`)
    Emphasis {
        /// Nested inline content
        children: Vec<Inline>,
    },

    /// Strong content (`**x**` or `__x__`)
    Strong {
        /// Nested inline content
        children: Vec<Inline>,
    },

    /// Inline code span, never further parsed
    Code {
        /// Code text
        code: String,
    },

    /// A hyperlink
    Link {
        /// Link destination
        href: String,
        /// Optional link title
        title: Option<String>,
        /// Link label content
        children: Vec<Inline>,
    },

    /// An inline image
    Image {
        /// Image source
        src: String,
        /// Alternative text
        alt: String,
        /// Optional image title
        title: Option<String>,
    },

    /// A hard line break
    LineBreak,

    /// A soft line break (single newline in the source)
    SoftBreak,
}

impl Inline {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }

    /// Create an inline code node.
    pub fn code(code: impl Into<String>) -> Self {
        Inline::Code { code: code.into() }
    }

    /// Get the plain text of this node and its children.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    pub(crate) fn push_plain_text(&self, out: &mut String) {
        match self {
            Inline::Text { text } => out.push_str(text),
            Inline::Code { code } => out.push_str(code),
            Inline::Emphasis { children }
            | Inline::Strong { children }
            | Inline::Link { children, .. } => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::LineBreak => out.push('\n'),
            Inline::SoftBreak => out.push(' '),
        }
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, Inline::Text { .. })
    }
}

/// Plain text of a sequence of inline nodes.
pub(crate) fn plain_text_of(content: &[Inline]) -> String {
    let mut out = String::new();
    for node in content {
        node.push_plain_text(&mut out);
    }
    out
}
