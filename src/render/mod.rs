//! Rendering module for converting slide decks to output formats.

mod html;
mod json;
mod options;
mod result;
pub mod streaming;
mod text;
mod theme;
pub mod visitor;

pub use html::{escape_html, to_html, to_html_with_stats, to_html_with_visitor, HtmlRenderer};
pub use json::{to_json, JsonFormat};
pub use options::{RenderOptions, SoftBreak};
pub use result::{DeckStats, RenderResult};
pub use streaming::{collect_markup, RenderEvent, StreamingRenderer};
pub use text::to_text;
pub use theme::Theme;
pub use visitor::{
    CompositeVisitor, DeckVisitor, DefaultVisitor, MaxHeadingDepthVisitor, SkipImagesVisitor,
    VisitorAction,
};
