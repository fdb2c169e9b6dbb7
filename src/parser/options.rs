//! Parsing options and configuration.

use serde::{Deserialize, Serialize};

/// Default bound on open blockquote/list-item containers.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 16;

/// Default tab stop width used when measuring indentation.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Options for parsing slide markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Maximum number of nested containers (blockquotes + list items)
    pub max_nesting_depth: usize,

    /// Columns a tab expands to
    pub tab_width: usize,

    /// Sanitize input (BOM, line endings, control characters) before splitting
    pub normalize_input: bool,

    /// Apply Unicode NFC normalization during sanitation
    pub unicode_nfc: bool,

    /// Whether to parse slides in parallel
    pub parallel: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth (at least 1).
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth.max(1);
        self
    }

    /// Set the tab width (at least 1).
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width.max(1);
        self
    }

    /// Enable or disable input sanitation.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_input = normalize;
        self
    }

    /// Enable or disable Unicode NFC normalization.
    pub fn with_unicode_nfc(mut self, nfc: bool) -> Self {
        self.unicode_nfc = nfc;
        self
    }

    /// Enable or disable parallel slide parsing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            tab_width: DEFAULT_TAB_WIDTH,
            normalize_input: true,
            unicode_nfc: false,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .with_max_nesting_depth(0)
            .with_tab_width(2)
            .with_unicode_nfc(true);

        assert_eq!(options.max_nesting_depth, 1);
        assert_eq!(options.tab_width, 2);
        assert!(options.unicode_nfc);
        assert!(options.normalize_input);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
        assert_eq!(options.tab_width, DEFAULT_TAB_WIDTH);
        assert!(!options.unicode_nfc);
        assert!(options.parallel);
        assert!(!options.sequential().parallel);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ParseOptions = serde_json::from_str(r#"{"tab_width": 8}"#).unwrap();
        assert_eq!(options.tab_width, 8);
        assert_eq!(options.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
    }
}
