//! HTML rendering for slide decks.
//!
//! Output is a single fragment:
//!
//! ```text
//! <div class="slide-deck theme-<id>" data-slide-count="N">
//! <section class="slide" data-index="0">
//! ...
//! </section>
//! </div>
//! ```
//!
//! The theme only appears as the root class. All text and attribute values
//! are escaped, and link targets with script-capable schemes are neutralized.

use std::fmt::Write as _;

use crate::model::{Alignment, Block, Inline, List, Slide, SlideDeck, Table};

use super::visitor::{DeckVisitor, VisitorAction};
use super::{DeckStats, RenderOptions, RenderResult, SoftBreak};

/// Render a deck to an HTML fragment.
pub fn to_html(deck: &SlideDeck, options: &RenderOptions) -> String {
    HtmlRenderer::new(options.clone()).render(deck)
}

/// Render a deck to HTML with statistics and diagnostics.
pub fn to_html_with_stats(deck: &SlideDeck, options: &RenderOptions) -> RenderResult {
    HtmlRenderer::new(options.clone()).render_with_stats(deck)
}

/// Render a deck to HTML, consulting `visitor` for each element.
pub fn to_html_with_visitor(
    deck: &SlideDeck,
    options: &RenderOptions,
    visitor: &mut dyn DeckVisitor,
) -> String {
    HtmlRenderer::with_visitor(options.clone(), visitor).render(deck)
}

/// HTML renderer.
pub struct HtmlRenderer<'v> {
    options: RenderOptions,
    visitor: Option<&'v mut dyn DeckVisitor>,
}

impl HtmlRenderer<'static> {
    /// Create a new HTML renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            visitor: None,
        }
    }
}

impl<'v> HtmlRenderer<'v> {
    /// Create a renderer that consults a visitor.
    pub fn with_visitor(options: RenderOptions, visitor: &'v mut dyn DeckVisitor) -> Self {
        Self {
            options,
            visitor: Some(visitor),
        }
    }

    /// Get the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a deck to an HTML fragment.
    pub fn render(mut self, deck: &SlideDeck) -> String {
        let mut out = self.deck_open(deck);
        for slide in &deck.slides {
            out.push_str(&self.slide_open(slide));
            for block in &slide.blocks {
                self.render_block(&mut out, block);
            }
            out.push_str(&self.slide_close(slide));
        }
        out.push_str(self.deck_close());
        out
    }

    /// Render a deck with statistics and diagnostics.
    pub fn render_with_stats(self, deck: &SlideDeck) -> RenderResult {
        let stats = DeckStats::from_deck(deck);
        let diagnostics = deck.diagnostics();
        RenderResult::new(self.render(deck), diagnostics, stats)
    }

    pub(crate) fn deck_open(&self, deck: &SlideDeck) -> String {
        format!(
            "<div class=\"slide-deck {}\" data-slide-count=\"{}\">\n",
            self.options.theme.class_name(),
            deck.slide_count()
        )
    }

    pub(crate) fn deck_close(&self) -> &'static str {
        "</div>\n"
    }

    pub(crate) fn slide_open(&mut self, slide: &Slide) -> String {
        if let Some(visitor) = self.visitor.as_deref_mut() {
            visitor.on_slide_start(slide.index);
        }
        let mut out = String::from("<section class=\"");
        push_escaped(&mut out, &self.options.slide_class);
        out.push('"');
        if self.options.include_slide_index {
            let _ = write!(out, " data-index=\"{}\"", slide.index);
        }
        out.push_str(">\n");
        out
    }

    pub(crate) fn slide_close(&mut self, slide: &Slide) -> String {
        if let Some(visitor) = self.visitor.as_deref_mut() {
            visitor.on_slide_end(slide.index);
        }
        "</section>\n".to_string()
    }

    fn visit<F>(&mut self, f: F) -> VisitorAction
    where
        F: FnOnce(&mut dyn DeckVisitor) -> VisitorAction,
    {
        match self.visitor.as_deref_mut() {
            Some(visitor) => f(visitor),
            None => VisitorAction::Continue,
        }
    }

    /// Apply a visitor action; returns true if the element was handled.
    fn apply(out: &mut String, action: VisitorAction) -> bool {
        match action {
            VisitorAction::Continue => false,
            VisitorAction::Replace(markup) => {
                out.push_str(&markup);
                true
            }
            VisitorAction::Skip => true,
        }
    }

    pub(crate) fn render_block(&mut self, out: &mut String, block: &Block) {
        match block {
            Block::Heading { level, content } => {
                let action = self.visit(|v| v.visit_heading(*level, &block.plain_text()));
                if Self::apply(out, action) {
                    return;
                }
                let _ = write!(out, "<h{}>", level);
                self.render_inlines(out, content);
                let _ = writeln!(out, "</h{}>", level);
            }
            Block::Paragraph { content } => self.render_paragraph(out, content, true),
            Block::List(list) => self.render_list(out, list),
            Block::CodeBlock { language, code } => {
                let action = self.visit(|v| v.visit_code_block(language.as_deref(), code));
                if Self::apply(out, action) {
                    return;
                }
                out.push_str("<pre><code");
                if let Some(language) = language {
                    out.push_str(" class=\"language-");
                    push_escaped(out, language);
                    out.push('"');
                }
                out.push('>');
                push_escaped(out, code);
                out.push_str("</code></pre>\n");
            }
            Block::Blockquote { children } => {
                out.push_str("<blockquote>\n");
                for child in children {
                    self.render_block(out, child);
                }
                out.push_str("</blockquote>\n");
            }
            Block::Table(table) => {
                let action = self.visit(|v| v.visit_table(table));
                if Self::apply(out, action) {
                    return;
                }
                self.render_table(out, table);
            }
            Block::ThematicRule => {
                let action = self.visit(|v| v.visit_rule());
                if Self::apply(out, action) {
                    return;
                }
                out.push_str("<hr>\n");
            }
            Block::Error { raw, message, .. } => {
                let action = self.visit(|v| v.visit_error(raw, message));
                if Self::apply(out, action) {
                    return;
                }
                out.push_str("<div class=\"md-error\"><pre class=\"md-error-source\">");
                push_escaped(out, raw);
                out.push_str("</pre><p class=\"md-error-message\">");
                push_escaped(out, message);
                out.push_str("</p></div>\n");
            }
        }
    }

    fn render_paragraph(&mut self, out: &mut String, content: &[Inline], wrap: bool) {
        let action = self.visit(|v| v.visit_paragraph(content));
        if Self::apply(out, action) {
            return;
        }
        if wrap {
            out.push_str("<p>");
            self.render_inlines(out, content);
            out.push_str("</p>\n");
        } else {
            self.render_inlines(out, content);
        }
    }

    fn render_list(&mut self, out: &mut String, list: &List) {
        if !list.ordered {
            out.push_str("<ul>\n");
        } else if list.start == 1 {
            out.push_str("<ol>\n");
        } else {
            let _ = writeln!(out, "<ol start=\"{}\">", list.start);
        }

        for item in &list.items {
            out.push_str("<li>");
            if !list.tight && !item.children.is_empty() {
                out.push('\n');
            }
            for child in &item.children {
                match child {
                    Block::Paragraph { content } if list.tight => {
                        self.render_paragraph(out, content, false)
                    }
                    _ => {
                        if !out.ends_with('\n') {
                            out.push('\n');
                        }
                        self.render_block(out, child);
                    }
                }
            }
            out.push_str("</li>\n");
        }

        out.push_str(if list.ordered { "</ol>\n" } else { "</ul>\n" });
    }

    fn render_table(&mut self, out: &mut String, table: &Table) {
        out.push_str("<table>\n<thead>\n<tr>\n");
        for (column, cell) in table.header.cells.iter().enumerate() {
            self.render_cell(out, "th", table.alignment(column), &cell.content);
        }
        out.push_str("</tr>\n</thead>\n");

        if !table.rows.is_empty() {
            out.push_str("<tbody>\n");
            for row in &table.rows {
                out.push_str("<tr>\n");
                for (column, cell) in row.cells.iter().enumerate() {
                    self.render_cell(out, "td", table.alignment(column), &cell.content);
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody>\n");
        }
        out.push_str("</table>\n");
    }

    fn render_cell(&mut self, out: &mut String, tag: &str, alignment: Alignment, content: &[Inline]) {
        match alignment.as_css() {
            Some(align) => {
                let _ = write!(out, "<{} style=\"text-align: {}\">", tag, align);
            }
            None => {
                let _ = write!(out, "<{}>", tag);
            }
        }
        self.render_inlines(out, content);
        let _ = writeln!(out, "</{}>", tag);
    }

    fn render_inlines(&mut self, out: &mut String, inlines: &[Inline]) {
        for inline in inlines {
            self.render_inline(out, inline);
        }
    }

    fn render_inline(&mut self, out: &mut String, inline: &Inline) {
        match inline {
            Inline::Text { text } => push_escaped(out, text),
            Inline::Emphasis { children } => {
                out.push_str("<em>");
                self.render_inlines(out, children);
                out.push_str("</em>");
            }
            Inline::Strong { children } => {
                out.push_str("<strong>");
                self.render_inlines(out, children);
                out.push_str("</strong>");
            }
            Inline::Code { code } => {
                out.push_str("<code>");
                push_escaped(out, code);
                out.push_str("</code>");
            }
            Inline::Link {
                href,
                title,
                children,
            } => {
                out.push_str("<a href=\"");
                push_escaped(out, sanitize_url(href));
                out.push('"');
                if let Some(title) = title {
                    out.push_str(" title=\"");
                    push_escaped(out, title);
                    out.push('"');
                }
                out.push('>');
                self.render_inlines(out, children);
                out.push_str("</a>");
            }
            Inline::Image { src, alt, title } => {
                let action = self.visit(|v| v.visit_image(src, alt));
                if Self::apply(out, action) {
                    return;
                }
                out.push_str("<img src=\"");
                push_escaped(out, sanitize_url(src));
                out.push_str("\" alt=\"");
                push_escaped(out, alt);
                out.push('"');
                if let Some(title) = title {
                    out.push_str(" title=\"");
                    push_escaped(out, title);
                    out.push('"');
                }
                out.push('>');
            }
            Inline::LineBreak => out.push_str("<br>\n"),
            Inline::SoftBreak => match self.options.soft_break {
                SoftBreak::Newline => out.push('\n'),
                SoftBreak::LineBreak => out.push_str("<br>\n"),
                SoftBreak::Space => out.push(' '),
            },
        }
    }
}

/// Append `text` with HTML special characters escaped.
pub(crate) fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Escape HTML special characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

/// Replace URLs with script-capable schemes by `#`.
pub(crate) fn sanitize_url(url: &str) -> &str {
    // Browsers ignore embedded whitespace and controls in the scheme.
    let scheme: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();

    let blocked = scheme.starts_with("javascript:")
        || scheme.starts_with("vbscript:")
        || (scheme.starts_with("data:") && !scheme.starts_with("data:image/"));
    if blocked {
        "#"
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListItem;
    use crate::render::Theme;

    fn deck(blocks: Vec<Block>) -> SlideDeck {
        SlideDeck {
            slides: vec![Slide::new(0, 1, blocks)],
        }
    }

    fn render(blocks: Vec<Block>) -> String {
        to_html(&deck(blocks), &RenderOptions::default())
    }

    #[test]
    fn test_deck_wrapper() {
        let html = render(vec![Block::heading(1, "Title")]);
        assert_eq!(
            html,
            "<div class=\"slide-deck theme-default\" data-slide-count=\"1\">\n\
             <section class=\"slide\" data-index=\"0\">\n\
             <h1>Title</h1>\n\
             </section>\n\
             </div>\n"
        );
    }

    #[test]
    fn test_theme_class_only_on_root() {
        let options = RenderOptions::default().with_theme(Theme::Dark);
        let html = to_html(&deck(vec![Block::paragraph("x")]), &options);
        assert_eq!(html.matches("theme-dark").count(), 1);
        assert!(html.starts_with("<div class=\"slide-deck theme-dark\""));
    }

    #[test]
    fn test_escaping() {
        let html = render(vec![Block::paragraph("<script>alert('x') & \"y\"</script>")]);
        assert!(html.contains(
            "<p>&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;</p>"
        ));
    }

    #[test]
    fn test_code_block() {
        let html = render(vec![Block::CodeBlock {
            language: Some("rust".into()),
            code: "let x = a < b;\n".into(),
        }]);
        assert!(html.contains("<pre><code class=\"language-rust\">let x = a &lt; b;\n</code></pre>"));
    }

    #[test]
    fn test_tight_and_loose_lists() {
        let mut list = List::bullet();
        list.items.push(ListItem::new(vec![Block::paragraph("one")]));
        let html = render(vec![Block::List(list.clone())]);
        assert!(html.contains("<ul>\n<li>one</li>\n</ul>\n"));

        list.tight = false;
        let html = render(vec![Block::List(list)]);
        assert!(html.contains("<ul>\n<li>\n<p>one</p>\n</li>\n</ul>\n"));
    }

    #[test]
    fn test_ordered_start() {
        let mut list = List::numbered(3);
        list.items.push(ListItem::new(vec![Block::paragraph("c")]));
        assert!(render(vec![Block::List(list)]).contains("<ol start=\"3\">"));

        let mut list = List::numbered(1);
        list.items.push(ListItem::new(vec![Block::paragraph("a")]));
        assert!(render(vec![Block::List(list)]).contains("<ol>\n"));
    }

    #[test]
    fn test_error_node() {
        let html = render(vec![Block::error("```\n<x>", "unclosed code fence", 1)]);
        assert!(html.contains(
            "<div class=\"md-error\"><pre class=\"md-error-source\">```\n&lt;x&gt;</pre>\
             <p class=\"md-error-message\">unclosed code fence</p></div>"
        ));
    }

    #[test]
    fn test_unsafe_links() {
        assert_eq!(sanitize_url("javascript:alert(1)"), "#");
        assert_eq!(sanitize_url(" JavaScript:alert(1)"), "#");
        assert_eq!(sanitize_url("java\tscript:alert(1)"), "#");
        assert_eq!(sanitize_url("data:text/html;base64,xx"), "#");
        assert_eq!(sanitize_url("data:image/png;base64,xx"), "data:image/png;base64,xx");
        assert_eq!(sanitize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_soft_break_modes() {
        let blocks = vec![Block::Paragraph {
            content: vec![Inline::text("a"), Inline::SoftBreak, Inline::text("b")],
        }];
        assert!(render(blocks.clone()).contains("<p>a\nb</p>"));

        let options = RenderOptions::default().with_soft_break(SoftBreak::LineBreak);
        assert!(to_html(&deck(blocks), &options).contains("<p>a<br>\nb</p>"));
    }

    #[test]
    fn test_slide_attributes() {
        let options = RenderOptions::default()
            .with_slide_class("page \"x\"")
            .with_slide_index(false);
        let html = to_html(&deck(vec![]), &options);
        assert!(html.contains("<section class=\"page &quot;x&quot;\">\n</section>"));
    }
}
