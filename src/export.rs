//! Standalone page export.
//!
//! Wraps the rendered deck fragment into a complete HTML document with the
//! theme stylesheet and print rules, one slide per printed page. The page
//! is what a host print-to-PDF facility consumes; pagination is left to it.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::SlideDeck;
use crate::render::{escape_html, to_html, RenderOptions};

/// Title used when neither the options nor the deck provide one.
pub const DEFAULT_TITLE: &str = "Presentation";

/// File name suggested for exported decks.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "presentation.pdf";

/// Options for the standalone export page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Document title; defaults to the first slide heading
    pub title: Option<String>,

    /// CSS page size keyword (`A4`, `letter`, ...)
    pub page_size: String,

    /// Print in landscape orientation
    pub landscape: bool,

    /// Ask the printer to keep slide backgrounds
    pub print_background: bool,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the page size keyword.
    pub fn with_page_size(mut self, size: impl Into<String>) -> Self {
        self.page_size = size.into();
        self
    }

    /// Set the orientation.
    pub fn with_landscape(mut self, landscape: bool) -> Self {
        self.landscape = landscape;
        self
    }

    /// Enable or disable background printing.
    pub fn with_print_background(mut self, print: bool) -> Self {
        self.print_background = print;
        self
    }

    fn page_rule(&self) -> String {
        let orientation = if self.landscape { "landscape" } else { "portrait" };
        format!("@page {{ size: {} {}; margin: 0; }}\n", self.page_size, orientation)
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            page_size: "A4".to_string(),
            landscape: true,
            print_background: true,
        }
    }
}

/// Render a deck as a complete, printable HTML page.
pub fn to_standalone_html(
    deck: &SlideDeck,
    render: &RenderOptions,
    export: &ExportOptions,
) -> String {
    let title = export
        .title
        .clone()
        .or_else(|| deck.slides.first().and_then(|slide| slide.title()))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let mut out = String::with_capacity(4096);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(&title));
    out.push_str("<style>\n");
    out.push_str(&render.theme.stylesheet());
    out.push_str(&export.page_rule());
    out.push_str(PRINT_RULES);
    if export.print_background {
        out.push_str(PRINT_BACKGROUND_RULES);
    }
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str(&to_html(deck, render));
    out.push_str("</body>\n</html>\n");

    log::debug!(
        "Exported {} slides as standalone page ({} bytes)",
        deck.slide_count(),
        out.len()
    );
    out
}

/// Write a standalone page to `path`.
pub fn write_standalone_html<P: AsRef<Path>>(
    path: P,
    deck: &SlideDeck,
    render: &RenderOptions,
    export: &ExportOptions,
) -> Result<()> {
    std::fs::write(path, to_standalone_html(deck, render, export))?;
    Ok(())
}

const PRINT_RULES: &str = r#"body { margin: 0; }
@media print {
  .slide-deck .slide {
    margin: 0;
    box-shadow: none;
    width: 100vw;
    height: 100vh;
    aspect-ratio: auto;
    page-break-after: always;
    break-after: page;
  }
  .slide-deck .slide:last-child { page-break-after: auto; break-after: auto; }
}
"#;

const PRINT_BACKGROUND_RULES: &str =
    "* { -webkit-print-color-adjust: exact; print-color-adjust: exact; }\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_deck, ParseOptions};
    use crate::render::Theme;

    #[test]
    fn test_title_from_first_slide() {
        let deck = parse_deck("intro\n\n## Q&A\n---\n# Later", &ParseOptions::default());
        let page = to_standalone_html(&deck, &RenderOptions::default(), &ExportOptions::new());
        assert!(page.contains("<title>Q&amp;A</title>"));
    }

    #[test]
    fn test_title_fallback() {
        let deck = parse_deck("just text", &ParseOptions::default());
        let page = to_standalone_html(&deck, &RenderOptions::default(), &ExportOptions::new());
        assert!(page.contains("<title>Presentation</title>"));
    }

    #[test]
    fn test_page_contains_fragment_and_stylesheet() {
        let deck = parse_deck("# A\n---\n# B", &ParseOptions::default());
        let render = RenderOptions::default().with_theme(Theme::Dark);
        let page = to_standalone_html(&deck, &render, &ExportOptions::new().with_title("Deck"));

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(".theme-dark {"));
        assert!(page.contains("@page { size: A4 landscape; margin: 0; }"));
        assert!(page.contains("print-color-adjust: exact"));
        assert!(page.contains(&to_html(&deck, &render)));
    }

    #[test]
    fn test_portrait_without_backgrounds() {
        let deck = SlideDeck::new();
        let export = ExportOptions::new()
            .with_page_size("letter")
            .with_landscape(false)
            .with_print_background(false);
        let page = to_standalone_html(&deck, &RenderOptions::default(), &export);

        assert!(page.contains("size: letter portrait"));
        assert!(!page.contains("print-color-adjust"));
    }

    #[test]
    fn test_write_standalone_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.html");
        let deck = parse_deck("# A", &ParseOptions::default());
        write_standalone_html(&path, &deck, &RenderOptions::default(), &ExportOptions::new())
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<h1>A</h1>"));
    }
}
