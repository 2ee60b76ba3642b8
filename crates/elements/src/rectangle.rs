//! Rectangle shape: a bar

use animation::ViewState;
use canvas::Canvas;
use serde::{Deserialize, Serialize};

use crate::drawable::{Drawable, ShapeStyle, TooltipPosition};
use crate::keys::*;

/// A vertical bar centered on `x`, spanning from `base` to `y`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub base: f64,
    pub width: f64,
    pub style: ShapeStyle,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, base: f64, width: f64) -> Self {
        Self {
            x,
            y,
            base,
            width,
            style: ShapeStyle::default(),
        }
    }

    pub fn from_view(view: &ViewState) -> Self {
        Self {
            x: view.number(X).unwrap_or(0.0),
            y: view.number(Y).unwrap_or(0.0),
            base: view.number(BASE).unwrap_or(0.0),
            width: view.number(WIDTH).unwrap_or(0.0),
            style: ShapeStyle::from_view(view),
        }
    }

    /// Signed height; negative for bars below their base
    pub fn height(&self) -> f64 {
        self.base - self.y
    }

    fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

impl Drawable for Rectangle {
    fn draw(&self, canvas: &mut dyn Canvas) {
        let half_stroke = self.style.border_width / 2.0;
        let (mut left, mut right, mut top) = (self.left(), self.right(), self.y);
        if self.style.border_width > 0.0 {
            left += half_stroke;
            right -= half_stroke;
            top += half_stroke;
        }

        canvas.begin_path();
        self.style.apply(canvas);
        canvas.move_to(left, self.base);
        canvas.line_to(left, top);
        canvas.line_to(right, top);
        canvas.line_to(right, self.base);
        canvas.fill();
        if self.style.border_width > 0.0 {
            canvas.stroke();
        }
    }

    fn in_range(&self, x: f64, y: f64) -> bool {
        let (low, high) = if self.y < self.base {
            (self.y, self.base)
        } else {
            (self.base, self.y)
        };
        self.in_group_range(x) && y >= low && y <= high
    }

    fn in_group_range(&self, x: f64) -> bool {
        x >= self.left() && x <= self.right()
    }

    fn tooltip_position(&self) -> TooltipPosition {
        TooltipPosition {
            x: self.x,
            y: self.y.min(self.base),
            padding: 0.0,
        }
    }
}
