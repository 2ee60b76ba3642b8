//! The shape capability and the style every shape carries

use animation::ViewState;
use canvas::Canvas;
use serde::{Deserialize, Serialize};

use crate::keys::{BACKGROUND_COLOR, BORDER_COLOR, BORDER_WIDTH, DEFAULT_COLOR};

/// Where a tooltip for an element is anchored
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipPosition {
    pub x: f64,
    pub y: f64,
    /// Distance the caret keeps from the anchor
    pub padding: f64,
}

/// Something a chart can draw and hit test
pub trait Drawable {
    fn draw(&self, canvas: &mut dyn Canvas);

    /// Whether a chart-space point lies on the shape
    fn in_range(&self, x: f64, y: f64) -> bool;

    /// Whether the shape's column contains `x`. Shapes without a
    /// horizontal extent never match.
    fn in_group_range(&self, _x: f64) -> bool {
        false
    }

    fn tooltip_position(&self) -> TooltipPosition;
}

/// Fill and border of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_COLOR.to_string(),
            border_color: DEFAULT_COLOR.to_string(),
            border_width: 0.0,
        }
    }
}

impl ShapeStyle {
    /// Read the style from a view state, options first
    pub fn from_view(view: &ViewState) -> Self {
        let defaults = Self::default();
        Self {
            background_color: view
                .option_color(BACKGROUND_COLOR)
                .map(str::to_string)
                .unwrap_or(defaults.background_color),
            border_color: view
                .option_color(BORDER_COLOR)
                .map(str::to_string)
                .unwrap_or(defaults.border_color),
            border_width: view.option_number(BORDER_WIDTH).unwrap_or(defaults.border_width),
        }
    }

    pub(crate) fn apply(&self, canvas: &mut dyn Canvas) {
        canvas.set_fill_style(&self.background_color);
        canvas.set_stroke_style(&self.border_color);
        canvas.set_line_width(self.border_width);
    }
}
