//! Recording canvas
//!
//! Captures every draw call as a serializable [`DrawCommand`] so a host can
//! replay the frame on a real surface, or a test can assert on it.

use crate::font::FontSpec;
use crate::surface::{Canvas, TextAlign, TextBaseline, TextMeasure};
use serde::{Deserialize, Serialize};

/// One captured drawing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DrawCommand {
    Clear,
    Save,
    Restore,
    Translate {
        x: f64,
        y: f64,
    },
    Rotate {
        radians: f64,
    },
    BeginPath,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    BezierCurveTo {
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    },
    ClosePath,
    Fill,
    Stroke,
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
    },
    SetFillStyle {
        color: String,
    },
    SetStrokeStyle {
        color: String,
    },
    SetLineWidth {
        width: f64,
    },
    SetFont {
        font: String,
    },
    SetTextAlign {
        align: TextAlign,
    },
    SetTextBaseline {
        baseline: TextBaseline,
    },
}

/// Text measurement that assumes a fixed advance per character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateTextMeasure {
    /// Character advance as a fraction of the font's pixel size
    pub char_width_ratio: f64,
}

impl Default for ApproximateTextMeasure {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
        }
    }
}

impl TextMeasure for ApproximateTextMeasure {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * font.pixel_size * self.char_width_ratio
    }
}

/// A canvas that records draw calls instead of rasterizing them
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    measure: ApproximateTextMeasure,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Create a new recording canvas of the given size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            measure: ApproximateTextMeasure::default(),
            commands: Vec::new(),
        }
    }

    /// Use a different text measurement
    pub fn with_measure(mut self, measure: ApproximateTextMeasure) -> Self {
        self.measure = measure;
        self
    }

    /// Change the surface size
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Commands recorded so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the canvas empty
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Texts filled so far, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded commands matching `predicate`
    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|cmd| predicate(cmd)).count()
    }

    /// Serialize the recorded frame as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.commands)
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl TextMeasure for RecordingCanvas {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f64 {
        self.measure.measure_text(text, font)
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, radians: f64) {
        self.push(DrawCommand::Rotate { radians });
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::LineTo { x, y });
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.push(DrawCommand::BezierCurveTo {
            cp1x,
            cp1y,
            cp2x,
            cp2y,
            x,
            y,
        });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, counter_clockwise: bool) {
        self.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
            counter_clockwise,
        });
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn set_fill_style(&mut self, color: &str) {
        self.push(DrawCommand::SetFillStyle {
            color: color.to_string(),
        });
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.push(DrawCommand::SetStrokeStyle {
            color: color.to_string(),
        });
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawCommand::SetLineWidth { width });
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.push(DrawCommand::SetFont {
            font: font.to_css_string(),
        });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.push(DrawCommand::SetTextAlign { align });
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.push(DrawCommand::SetTextBaseline { baseline });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_path() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0);
        canvas.begin_path();
        canvas.move_to(0.0, 0.0);
        canvas.line_to(10.0, 10.0);
        canvas.stroke();

        assert_eq!(canvas.commands().len(), 4);
        assert_eq!(canvas.commands()[2], DrawCommand::LineTo { x: 10.0, y: 10.0 });
    }

    #[test]
    fn test_clear_resets_commands() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0);
        canvas.fill_text("a", 0.0, 0.0);
        canvas.clear();
        assert_eq!(canvas.commands(), &[DrawCommand::Clear]);
    }

    #[test]
    fn test_texts_and_count() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0);
        canvas.fill_text("Jan", 0.0, 0.0);
        canvas.stroke();
        canvas.fill_text("Feb", 10.0, 0.0);

        assert_eq!(canvas.texts(), vec!["Jan", "Feb"]);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Stroke)), 1);
    }

    #[test]
    fn test_json_is_tagged() {
        let mut canvas = RecordingCanvas::new(100.0, 50.0);
        canvas.move_to(1.0, 2.0);
        let json = canvas.to_json().unwrap();
        assert!(json.contains("\"type\":\"MoveTo\""));
    }

    #[test]
    fn test_approximate_measure() {
        let canvas = RecordingCanvas::new(100.0, 50.0);
        let width = canvas.measure_text("abcde", &FontSpec::sized(10.0));
        assert!((width - 30.0).abs() < 1e-9);
    }
}
