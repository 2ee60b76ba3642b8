//! Line shape and spline control points

use animation::ViewState;
use canvas::Canvas;
use serde::{Deserialize, Serialize};

use crate::drawable::{Drawable, ShapeStyle, TooltipPosition};
use crate::keys::{FILL, SCALE_ZERO, TENSION};
use crate::point::{ControlPoints, Point};

/// Control points for `middle` on a curve through `previous` and `next`.
///
/// `tension` of 0 puts both handles on the point itself.
pub fn spline_curve(previous: (f64, f64), middle: (f64, f64), next: (f64, f64), tension: f64) -> ControlPoints {
    let d01 = (middle.0 - previous.0).hypot(middle.1 - previous.1);
    let d12 = (next.0 - middle.0).hypot(next.1 - middle.1);
    let total = d01 + d12;
    let (fa, fb) = if total > 0.0 {
        (tension * d01 / total, tension * d12 / total)
    } else {
        (0.0, 0.0)
    };
    let (dx, dy) = (next.0 - previous.0, next.1 - previous.1);
    ControlPoints {
        previous_x: middle.0 - fa * dx,
        previous_y: middle.1 - fa * dy,
        next_x: middle.0 + fb * dx,
        next_y: middle.1 + fb * dy,
    }
}

/// Control points for every point of a line. A closed line wraps around
/// at its ends; an open one flattens its end handles.
pub fn line_control_points(points: &[(f64, f64)], tension: f64, closed: bool) -> Vec<ControlPoints> {
    let count = points.len();
    points
        .iter()
        .enumerate()
        .map(|(index, &middle)| {
            let previous = match index {
                0 if closed => points[count - 1],
                0 => middle,
                _ => points[index - 1],
            };
            let next = if index + 1 == count {
                if closed {
                    points[0]
                } else {
                    middle
                }
            } else {
                points[index + 1]
            };
            spline_curve(previous, middle, next, tension)
        })
        .collect()
}

/// A polyline through a dataset's points
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub points: Vec<Point>,
    /// Curves through control points when positive
    pub tension: f64,
    /// Joins the last point back to the first
    pub closed: bool,
    /// Fill the area under the line (or inside it when closed)
    pub fill: bool,
    /// Pixel the fill of an open line extends down to
    pub scale_zero: f64,
    pub style: ShapeStyle,
}

impl Line {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    pub fn with_fill(mut self, scale_zero: f64) -> Self {
        self.fill = true;
        self.scale_zero = scale_zero;
        self
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Style, tension and fill from `view`, geometry from `points`
    pub fn from_view(view: &ViewState, points: Vec<Point>) -> Self {
        Self {
            points,
            tension: view.option_number(TENSION).unwrap_or(0.0),
            fill: view.option_flag(FILL).unwrap_or(false),
            scale_zero: view.number(SCALE_ZERO).unwrap_or(0.0),
            style: ShapeStyle::from_view(view),
            ..Self::default()
        }
    }

    fn segment(&self, canvas: &mut dyn Canvas, from: &Point, to: &Point) {
        if self.tension > 0.0 {
            canvas.bezier_curve_to(
                from.control_points.next_x,
                from.control_points.next_y,
                to.control_points.previous_x,
                to.control_points.previous_y,
                to.x,
                to.y,
            );
        } else {
            canvas.line_to(to.x, to.y);
        }
    }

    fn trace(&self, canvas: &mut dyn Canvas) {
        let mut last: Option<&Point> = None;
        let mut first: Option<&Point> = None;
        for point in &self.points {
            if point.skip {
                last = None;
                continue;
            }
            match last {
                Some(previous) => self.segment(canvas, previous, point),
                None => canvas.move_to(point.x, point.y),
            }
            first = first.or(Some(point));
            last = Some(point);
        }
        if self.closed {
            if let (Some(last), Some(first)) = (last, first) {
                self.segment(canvas, last, first);
            }
        }
    }

    fn visible(&self) -> impl Iterator<Item = &Point> {
        self.points.iter().filter(|point| !point.skip)
    }
}

impl Drawable for Line {
    fn draw(&self, canvas: &mut dyn Canvas) {
        let (Some(first), Some(last)) = (self.visible().next(), self.visible().last()) else {
            return;
        };

        if self.fill {
            canvas.begin_path();
            self.trace(canvas);
            if !self.closed {
                canvas.line_to(last.x, self.scale_zero);
                canvas.line_to(first.x, self.scale_zero);
            }
            canvas.close_path();
            canvas.set_fill_style(&self.style.background_color);
            canvas.fill();
        }

        canvas.set_line_width(self.style.border_width);
        canvas.set_stroke_style(&self.style.border_color);
        canvas.begin_path();
        self.trace(canvas);
        canvas.stroke();
    }

    fn in_range(&self, x: f64, y: f64) -> bool {
        self.visible().any(|point| point.in_range(x, y))
    }

    fn tooltip_position(&self) -> TooltipPosition {
        self.visible()
            .next()
            .map(Drawable::tooltip_position)
            .unwrap_or_default()
    }
}
