//! # mdslides
//!
//! Markdown-to-slide compiler for Rust.
//!
//! This library splits a single markdown document into slides, parses each
//! slide into a content tree and renders the deck as a themed HTML fragment.
//! Compilation is total: malformed markdown becomes visible error nodes plus
//! diagnostics, never an `Err`.
//!
//! ## Quick Start
//!
//! ```
//! let output = mdslides::compile("# Hello\n---\n- one\n- two", "dark");
//!
//! assert_eq!(output.slide_count, 2);
//! assert!(output.html.contains("theme-dark"));
//! assert!(output.diagnostics.is_empty());
//! ```
//!
//! ## Features
//!
//! - **Fence-aware splitting**: `---` inside fenced code never splits a slide
//! - **Bounded nesting**: lists and blockquotes use an explicit, depth-limited stack
//! - **Theme decoupling**: the theme is a single root class, slide markup never changes
//! - **Parallel parsing**: uses Rayon for large decks, output is identical
//! - **Preview worker**: background compilation with last-write-wins delivery
//! - **Export**: standalone printable HTML with the theme stylesheet

pub mod cache;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod preview;
pub mod render;
pub mod workspace;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types
pub use cache::CompileCache;
pub use error::{Error, Result};
pub use export::{to_standalone_html, ExportOptions};
pub use model::{
    Alignment, Block, Diagnostic, Inline, List, ListItem, RawSlide, Slide, SlideDeck, Table,
    TableCell, TableRow,
};
pub use parser::{parse_deck, ParseOptions};
pub use preview::{PreviewUpdate, PreviewWorker};
pub use render::{DeckStats, JsonFormat, RenderOptions, SoftBreak, Theme};
pub use workspace::{Host, HostRequest, HostResponse};

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Message carried by the error node that replaces a document the pipeline
/// could not compile.
const INTERNAL_ERROR_MESSAGE: &str = "internal compiler error";

/// Result of compiling a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOutput {
    /// Rendered HTML fragment
    pub html: String,

    /// One entry per error node, in document order
    pub diagnostics: Vec<Diagnostic>,

    /// Number of slides in the deck
    pub slide_count: usize,
}

impl CompileOutput {
    /// Check if any diagnostics were produced.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Options for the whole compile pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Parsing options
    pub parse: ParseOptions,

    /// Rendering options (the theme lives here)
    pub render: RenderOptions,

    /// Entries kept by [`Compiler`]'s cache; 0 disables caching
    pub cache_capacity: usize,
}

impl CompileOptions {
    /// Create new compile options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON string. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.render = self.render.with_theme(theme);
        self
    }

    /// Set the theme by id; unknown ids select the default theme.
    pub fn with_theme_id(mut self, id: &str) -> Self {
        self.render = self.render.with_theme_id(id);
        self
    }

    /// Set the maximum container nesting depth.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.parse = self.parse.with_max_nesting_depth(depth);
        self
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Set the cache capacity used by [`Compiler`].
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Disable parallel slide parsing.
    pub fn sequential(mut self) -> Self {
        self.parse = self.parse.sequential();
        self
    }
}

/// Compile a document with a theme id.
///
/// Unknown theme ids fall back to the default theme. This function never
/// fails; problems in the markdown show up as error nodes in the HTML and as
/// entries in [`CompileOutput::diagnostics`].
///
/// # Example
///
/// ```
/// let output = mdslides::compile("A\n---\nB\n---\nC", "default");
/// assert_eq!(output.slide_count, 3);
/// ```
pub fn compile(text: &str, theme: &str) -> CompileOutput {
    compile_with_options(text, &CompileOptions::new().with_theme_id(theme))
}

/// Compile a document with custom options.
pub fn compile_with_options(text: &str, options: &CompileOptions) -> CompileOutput {
    match panic::catch_unwind(AssertUnwindSafe(|| compile_deck(text, options))) {
        Ok(output) => output,
        Err(_) => {
            log::warn!(
                "Compile pipeline panicked on {} bytes of input; rendering fallback",
                text.len()
            );
            render_deck(&fallback_deck(text), &options.render)
        }
    }
}

fn compile_deck(text: &str, options: &CompileOptions) -> CompileOutput {
    let deck = parse_deck(text, &options.parse);
    render_deck(&deck, &options.render)
}

fn render_deck(deck: &SlideDeck, options: &RenderOptions) -> CompileOutput {
    CompileOutput {
        html: render::to_html(deck, options),
        diagnostics: deck.diagnostics(),
        slide_count: deck.slide_count(),
    }
}

/// A single slide holding one error node that wraps the whole document.
fn fallback_deck(text: &str) -> SlideDeck {
    SlideDeck {
        slides: vec![Slide::new(
            0,
            1,
            vec![Block::error(text, INTERNAL_ERROR_MESSAGE, 1)],
        )],
    }
}

/// Reusable compiler with fixed options and an optional result cache.
///
/// # Example
///
/// ```
/// use mdslides::Compiler;
///
/// let mut compiler = Compiler::new()
///     .with_max_nesting_depth(8)
///     .with_cache(16);
///
/// let first = compiler.compile("# Title", "serif");
/// let second = compiler.compile("# Title", "serif");
/// assert_eq!(first, second);
/// assert_eq!(compiler.cache().map(|c| c.hits()), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Compiler {
    options: CompileOptions,
    cache: Option<CompileCache>,
}

impl Compiler {
    /// Create a new compiler with default options and no cache.
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    /// Create a compiler from options; a cache is created when
    /// `cache_capacity > 0`.
    pub fn with_options(options: CompileOptions) -> Self {
        let cache = (options.cache_capacity > 0).then(|| CompileCache::new(options.cache_capacity));
        Self { options, cache }
    }

    /// Enable caching with the given capacity.
    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.options.cache_capacity = capacity;
        self.cache = (capacity > 0).then(|| CompileCache::new(capacity));
        self
    }

    /// Set the maximum container nesting depth.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.options = self.options.with_max_nesting_depth(depth);
        self.clear_cache();
        self
    }

    /// Set rendering options; the theme is still chosen per call.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.options.render = render;
        self.clear_cache();
        self
    }

    /// Disable parallel slide parsing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Get the compile options.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Get the cache, if enabled.
    pub fn cache(&self) -> Option<&CompileCache> {
        self.cache.as_ref()
    }

    /// Drop all cached results.
    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }

    /// Parse a document without rendering it.
    pub fn parse(&self, text: &str) -> SlideDeck {
        parse_deck(text, &self.options.parse)
    }

    /// Compile a document with a theme id.
    pub fn compile(&mut self, text: &str, theme: &str) -> CompileOutput {
        let theme = Theme::resolve(theme);
        let options = self.options.clone().with_theme(theme);

        match self.cache.as_mut() {
            Some(cache) => {
                cache.get_or_insert_with(text, theme, || compile_with_options(text, &options))
            }
            None => compile_with_options(text, &options),
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_splits_slides() {
        let output = compile("A\n---\nB\n---\nC", "default");
        assert_eq!(output.slide_count, 3);
        assert!(output.html.contains("<p>A</p>"));
        assert!(output.html.contains("<p>B</p>"));
        assert!(output.html.contains("<p>C</p>"));
        assert!(!output.has_errors());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let text = "# Title\n\n*em* and **strong**\n---\n| a | b |\n|---|:-:|\n| 1 | 2 |";
        assert_eq!(compile(text, "dark"), compile(text, "dark"));
    }

    #[test]
    fn test_compile_unknown_theme_falls_back() {
        let output = compile("x", "no-such-theme");
        assert!(output.html.contains("theme-default"));
    }

    #[test]
    fn test_compile_reports_diagnostics() {
        let output = compile("intro\n---\n```\nunclosed", "default");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].line, 3);
        assert_eq!(output.diagnostics[0].message, "unclosed code fence");
        assert!(output.html.contains("md-error"));
    }

    #[test]
    fn test_fallback_deck() {
        let output = render_deck(&fallback_deck("<b>"), &RenderOptions::default());
        assert_eq!(output.slide_count, 1);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].message, INTERNAL_ERROR_MESSAGE);
        assert!(output.html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_compile_options_from_json() {
        let options = CompileOptions::from_json_str(
            r#"{"parse": {"max_nesting_depth": 4}, "render": {"theme": "contrast"}, "cache_capacity": 8}"#,
        )
        .unwrap();
        assert_eq!(options.parse.max_nesting_depth, 4);
        assert_eq!(options.render.theme, Theme::Contrast);
        assert_eq!(options.cache_capacity, 8);
    }

    #[test]
    fn test_compile_options_invalid_json() {
        let result = CompileOptions::from_json_str("{not json");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_compile_options_builder() {
        let options = CompileOptions::new()
            .with_theme_id("light")
            .with_max_nesting_depth(3)
            .with_cache_capacity(2)
            .sequential();
        assert_eq!(options.render.theme, Theme::Light);
        assert_eq!(options.parse.max_nesting_depth, 3);
        assert!(!options.parse.parallel);
    }

    #[test]
    fn test_compiler_cache_keyed_by_theme() {
        let mut compiler = Compiler::new().with_cache(4);
        let dark = compiler.compile("# T", "dark");
        let light = compiler.compile("# T", "light");
        assert_ne!(dark.html, light.html);

        compiler.compile("# T", "DARK");
        let cache = compiler.cache().unwrap();
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_compiler_without_cache() {
        let mut compiler = Compiler::new();
        assert!(compiler.cache().is_none());
        assert_eq!(compiler.compile("a", "default").slide_count, 1);
    }

    #[test]
    fn test_compiler_matches_compile() {
        let text = "- a\n  - b\n- c";
        let mut compiler = Compiler::new().sequential();
        assert_eq!(compiler.compile(text, "serif"), compile(text, "serif"));
    }
}
