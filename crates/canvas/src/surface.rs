//! Drawing-surface capability
//!
//! Scales and elements never talk to a concrete backend. They draw through
//! [`Canvas`], a 2D path API modelled on the HTML canvas context, and size
//! text through [`TextMeasure`].

use crate::font::FontSpec;
use serde::{Deserialize, Serialize};

/// Measures rendered text width
pub trait TextMeasure {
    /// Width in pixels of `text` rendered with `font`
    fn measure_text(&self, text: &str, font: &FontSpec) -> f64;
}

/// Horizontal text alignment relative to the fill position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to the fill position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
    #[default]
    Alphabetic,
}

/// A 2D drawing surface
pub trait Canvas: TextMeasure {
    /// Surface width in pixels
    fn width(&self) -> f64;
    /// Surface height in pixels
    fn height(&self) -> f64;

    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, radians: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64);
    /// Circular arc; angles in radians measured clockwise from the positive x axis
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, counter_clockwise: bool);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_font(&mut self, font: &FontSpec);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
}

/// Width of the widest label
pub fn longest_text<M: TextMeasure + ?Sized>(measure: &M, font: &FontSpec, labels: &[String]) -> f64 {
    labels
        .iter()
        .map(|label| measure.measure_text(label, font))
        .fold(0.0, f64::max)
}

/// Half-pixel offset that keeps odd-width lines crisp
pub fn alias_pixel(line_width: f64) -> f64 {
    if line_width % 2.0 == 0.0 {
        0.0
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::ApproximateTextMeasure;

    #[test]
    fn test_longest_text() {
        let measure = ApproximateTextMeasure::default();
        let font = FontSpec::sized(10.0);
        let labels = vec!["a".to_string(), "abcd".to_string(), "ab".to_string()];
        let longest = longest_text(&measure, &font, &labels);
        assert_eq!(longest, measure.measure_text("abcd", &font));
    }

    #[test]
    fn test_longest_text_empty() {
        let measure = ApproximateTextMeasure::default();
        assert_eq!(longest_text(&measure, &FontSpec::default(), &[]), 0.0);
    }

    #[test]
    fn test_alias_pixel() {
        assert_eq!(alias_pixel(1.0), 0.5);
        assert_eq!(alias_pixel(2.0), 0.0);
        assert_eq!(alias_pixel(3.0), 0.5);
    }
}
