//! Rendering options and configuration.

use serde::{Deserialize, Serialize};

use super::Theme;

/// Options for rendering a deck to HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Theme applied to the deck root
    pub theme: Theme,

    /// How soft line breaks inside paragraphs are rendered
    pub soft_break: SoftBreak,

    /// Class attribute of each slide section
    pub slide_class: String,

    /// Emit `data-index` on each slide section
    pub include_slide_index: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the theme by id; unknown ids select the default theme.
    pub fn with_theme_id(mut self, id: &str) -> Self {
        self.theme = Theme::resolve(id);
        self
    }

    /// Set soft break rendering.
    pub fn with_soft_break(mut self, soft_break: SoftBreak) -> Self {
        self.soft_break = soft_break;
        self
    }

    /// Set the slide section class.
    pub fn with_slide_class(mut self, class: impl Into<String>) -> Self {
        self.slide_class = class.into();
        self
    }

    /// Enable or disable `data-index` attributes.
    pub fn with_slide_index(mut self, include: bool) -> Self {
        self.include_slide_index = include;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: Theme::Default,
            soft_break: SoftBreak::Newline,
            slide_class: "slide".to_string(),
            include_slide_index: true,
        }
    }
}

/// Rendering of soft line breaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftBreak {
    /// Keep a newline (displayed as a space)
    #[default]
    Newline,
    /// Render as a hard `<br>`
    LineBreak,
    /// Replace with a single space
    Space,
}
