//! Point shape

use animation::ViewState;
use canvas::Canvas;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::drawable::{Drawable, ShapeStyle, TooltipPosition};
use crate::keys::*;

/// Bezier handles on either side of a point of a curved line
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPoints {
    pub previous_x: f64,
    pub previous_y: f64,
    pub next_x: f64,
    pub next_y: f64,
}

impl ControlPoints {
    /// Handles that coincide with the point itself
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            previous_x: x,
            previous_y: y,
            next_x: x,
            next_y: y,
        }
    }

    /// Keep both handles inside a rectangle
    pub fn clamp_to(&mut self, left: f64, top: f64, right: f64, bottom: f64) {
        self.previous_x = self.previous_x.clamp(left, right.max(left));
        self.next_x = self.next_x.clamp(left, right.max(left));
        self.previous_y = self.previous_y.clamp(top, bottom.max(top));
        self.next_y = self.next_y.clamp(top, bottom.max(top));
    }
}

/// A circle marking one data value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Extra hit radius around the drawn circle
    pub hit_radius: f64,
    /// Value is missing; the point is not drawn
    pub skip: bool,
    pub control_points: ControlPoints,
    pub style: ShapeStyle,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            control_points: ControlPoints::at(x, y),
            ..Self::default()
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_hit_radius(mut self, hit_radius: f64) -> Self {
        self.hit_radius = hit_radius;
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn from_view(view: &ViewState) -> Self {
        let x = view.number(X).unwrap_or(0.0);
        let y = view.number(Y).unwrap_or(0.0);
        Self {
            x,
            y,
            radius: view.option_number(RADIUS).unwrap_or(0.0),
            hit_radius: view.option_number(HIT_RADIUS).unwrap_or(0.0),
            skip: view.flag(SKIP).unwrap_or(false),
            control_points: ControlPoints {
                previous_x: view.number(CONTROL_POINT_PREVIOUS_X).unwrap_or(x),
                previous_y: view.number(CONTROL_POINT_PREVIOUS_Y).unwrap_or(y),
                next_x: view.number(CONTROL_POINT_NEXT_X).unwrap_or(x),
                next_y: view.number(CONTROL_POINT_NEXT_Y).unwrap_or(y),
            },
            style: ShapeStyle::from_view(view),
        }
    }
}

impl Drawable for Point {
    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.skip || (self.radius <= 0.0 && self.style.border_width <= 0.0) {
            return;
        }
        canvas.begin_path();
        canvas.arc(self.x, self.y, self.radius.max(0.0), 0.0, TAU, false);
        canvas.close_path();
        self.style.apply(canvas);
        canvas.fill();
        canvas.stroke();
    }

    fn in_range(&self, x: f64, y: f64) -> bool {
        let reach = self.hit_radius + self.radius;
        (x - self.x).powi(2) + (y - self.y).powi(2) < reach.powi(2)
    }

    fn in_group_range(&self, x: f64) -> bool {
        (x - self.x).powi(2) < (self.radius + self.hit_radius).powi(2)
    }

    fn tooltip_position(&self) -> TooltipPosition {
        TooltipPosition {
            x: self.x,
            y: self.y,
            padding: self.radius + self.style.border_width,
        }
    }
}
