//! Presentation themes.
//!
//! A theme only changes the class on the deck root (`theme-<id>`); slide
//! markup is identical across themes. Each theme also carries a stylesheet
//! for the standalone export page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The fixed set of themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Neutral white slides with a blue accent
    #[default]
    Default,
    /// Light text on a dark background
    Dark,
    /// Soft off-white background
    Light,
    /// Serif typography for text-heavy decks
    Serif,
    /// High-contrast black and yellow
    Contrast,
}

impl Theme {
    /// All themes in display order.
    pub const ALL: [Theme; 5] = [
        Theme::Default,
        Theme::Dark,
        Theme::Light,
        Theme::Serif,
        Theme::Contrast,
    ];

    /// Get the theme identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Serif => "serif",
            Theme::Contrast => "contrast",
        }
    }

    /// Get a short human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Theme::Default => "Neutral white slides with a blue accent",
            Theme::Dark => "Light text on a dark background",
            Theme::Light => "Soft off-white background",
            Theme::Serif => "Serif typography for text-heavy decks",
            Theme::Contrast => "High-contrast black and yellow",
        }
    }

    /// Numbered alias (`theme1` ..), following display order.
    pub fn alias(&self) -> String {
        let position = Theme::ALL.iter().position(|t| t == self).unwrap_or(0);
        format!("theme{}", position + 1)
    }

    /// Look up a numbered alias such as `theme2` or `theme-2`.
    fn from_alias(id: &str) -> Option<Theme> {
        let prefix = id.get(..5)?;
        if !prefix.eq_ignore_ascii_case("theme") {
            return None;
        }
        let number = id[5..].strip_prefix('-').unwrap_or(&id[5..]);
        let index = number.parse::<usize>().ok()?.checked_sub(1)?;
        Theme::ALL.get(index).copied()
    }

    /// Root class applied to the rendered deck.
    pub fn class_name(&self) -> String {
        format!("theme-{}", self.id())
    }

    /// Resolve a theme id, falling back to [`Theme::Default`] when unknown.
    pub fn resolve(id: &str) -> Theme {
        id.parse().unwrap_or_else(|_| {
            log::debug!("Unknown theme '{}', using default", id);
            Theme::Default
        })
    }

    /// Full stylesheet for this theme.
    pub fn stylesheet(&self) -> String {
        let (background, foreground, accent, code_background, font) = match self {
            Theme::Default => ("#ffffff", "#1f2933", "#2563eb", "#f3f4f6", SANS),
            Theme::Dark => ("#111827", "#e5e7eb", "#60a5fa", "#1f2937", SANS),
            Theme::Light => ("#fbf8f1", "#3d3a35", "#b45309", "#efe9dc", SANS),
            Theme::Serif => ("#fffdf8", "#2b2b2b", "#7c2d12", "#f4efe6", SERIF),
            Theme::Contrast => ("#000000", "#ffff00", "#00ffff", "#1a1a1a", SANS),
        };
        format!(
            ".{class} {{\n  --slide-bg: {background};\n  --slide-fg: {foreground};\n  \
             --slide-accent: {accent};\n  --slide-code-bg: {code_background};\n  \
             --slide-font: {font};\n}}\n{BASE_STYLESHEET}",
            class = self.class_name(),
        )
    }
}

const SANS: &str = "-apple-system, 'Segoe UI', Helvetica, Arial, sans-serif";
const SERIF: &str = "Georgia, 'Times New Roman', serif";

const BASE_STYLESHEET: &str = r#".slide-deck { font-family: var(--slide-font); color: var(--slide-fg); }
.slide-deck .slide {
  box-sizing: border-box;
  width: 100%;
  aspect-ratio: 16 / 9;
  padding: 4% 6%;
  margin: 0 0 2rem 0;
  overflow: hidden;
  background: var(--slide-bg);
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.15);
}
.slide-deck h1, .slide-deck h2, .slide-deck h3 { color: var(--slide-accent); }
.slide-deck a { color: var(--slide-accent); }
.slide-deck pre, .slide-deck code { background: var(--slide-code-bg); font-family: Menlo, Consolas, monospace; }
.slide-deck pre { padding: 0.75em 1em; overflow-x: auto; }
.slide-deck blockquote { border-left: 4px solid var(--slide-accent); margin-left: 0; padding-left: 1em; }
.slide-deck table { border-collapse: collapse; }
.slide-deck th, .slide-deck td { border: 1px solid currentColor; padding: 0.3em 0.6em; }
.slide-deck img { max-width: 100%; }
.slide-deck .md-error { border: 2px dashed #dc2626; padding: 0.5em; }
.slide-deck .md-error-source { background: transparent; color: inherit; }
.slide-deck .md-error-message { color: #dc2626; font-weight: bold; margin: 0.25em 0 0 0; }
"#;

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.id().eq_ignore_ascii_case(wanted))
            .or_else(|| Theme::from_alias(wanted))
            .ok_or_else(|| Error::UnknownTheme(s.to_string()))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
