//! Font descriptions

use serde::{Deserialize, Serialize};

/// Default font family used by every text-bearing part of a chart
pub const DEFAULT_FONT_FAMILY: &str = "'Helvetica Neue', 'Helvetica', 'Arial', sans-serif";

/// Default font size in pixels
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Default font style
pub const DEFAULT_FONT_STYLE: &str = "normal";

/// A font as `{style, pixelSize, family}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    pub style: String,
    pub pixel_size: f64,
    pub family: String,
}

impl FontSpec {
    /// Create a new font
    pub fn new(style: impl Into<String>, pixel_size: f64, family: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            pixel_size,
            family: family.into(),
        }
    }

    /// Default font at the given size
    pub fn sized(pixel_size: f64) -> Self {
        Self {
            pixel_size,
            ..Self::default()
        }
    }

    /// Set the style
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the family
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Encode as a CSS font string, e.g. `normal 12px Arial`
    pub fn to_css_string(&self) -> String {
        format!("{} {}px {}", self.style, self.pixel_size, self.family)
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_STYLE, DEFAULT_FONT_SIZE, DEFAULT_FONT_FAMILY)
    }
}

impl std::fmt::Display for FontSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_css_string())
    }
}
