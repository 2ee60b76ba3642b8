//! Arc shape: a doughnut or pie segment

use animation::ViewState;
use canvas::Canvas;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::drawable::{Drawable, ShapeStyle, TooltipPosition};
use crate::keys::*;

/// A point relative to a center, in chart angle convention
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarCoordinate {
    /// Radians in `[-π/2, 3π/2)`: `-π/2` is straight up, increasing clockwise
    pub angle: f64,
    pub distance: f64,
}

/// Angle and distance of `point` as seen from `center`
pub fn angle_from_point(center: (f64, f64), point: (f64, f64)) -> PolarCoordinate {
    let dx = point.0 - center.0;
    let dy = point.1 - center.1;
    let mut angle = dy.atan2(dx);
    if angle < -FRAC_PI_2 {
        angle += TAU;
    }
    PolarCoordinate {
        angle,
        distance: dx.hypot(dy),
    }
}

/// A ring segment between two angles
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc {
    pub x: f64,
    pub y: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub style: ShapeStyle,
}

impl Arc {
    pub fn new(x: f64, y: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            x,
            y,
            start_angle,
            end_angle,
            ..Self::default()
        }
    }

    pub fn with_radii(mut self, inner: f64, outer: f64) -> Self {
        self.inner_radius = inner;
        self.outer_radius = outer;
        self
    }

    pub fn from_view(view: &ViewState) -> Self {
        Self {
            x: view.number(X).unwrap_or(0.0),
            y: view.number(Y).unwrap_or(0.0),
            start_angle: view.number(START_ANGLE).unwrap_or(0.0),
            end_angle: view.number(END_ANGLE).unwrap_or(0.0),
            inner_radius: view.number(INNER_RADIUS).unwrap_or(0.0),
            outer_radius: view.number(OUTER_RADIUS).unwrap_or(0.0),
            style: ShapeStyle::from_view(view),
        }
    }

    pub fn circumference(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

impl Drawable for Arc {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.begin_path();
        canvas.arc(self.x, self.y, self.outer_radius, self.start_angle, self.end_angle, false);
        canvas.arc(self.x, self.y, self.inner_radius, self.end_angle, self.start_angle, true);
        canvas.close_path();
        self.style.apply(canvas);
        canvas.fill();
        if self.style.border_width > 0.0 {
            canvas.stroke();
        }
    }

    fn in_range(&self, x: f64, y: f64) -> bool {
        let polar = angle_from_point((self.x, self.y), (x, y));
        let offset = (polar.angle - self.start_angle).rem_euclid(TAU);
        let between_angles = self.circumference() >= TAU || offset <= self.circumference();
        let within_radius = polar.distance >= self.inner_radius && polar.distance <= self.outer_radius;
        between_angles && within_radius
    }

    fn tooltip_position(&self) -> TooltipPosition {
        let centre_angle = self.start_angle + self.circumference() / 2.0;
        let range_from_centre = (self.outer_radius - self.inner_radius) / 2.0 + self.inner_radius;
        TooltipPosition {
            x: self.x + centre_angle.cos() * range_from_centre,
            y: self.y + centre_angle.sin() * range_from_centre,
            padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas::{DrawCommand, RecordingCanvas};
    use std::f64::consts::PI;

    fn quarter() -> Arc {
        Arc::new(50.0, 50.0, -FRAC_PI_2, 0.0).with_radii(10.0, 40.0)
    }

    #[test]
    fn test_angle_from_point() {
        let up = angle_from_point((0.0, 0.0), (0.0, -5.0));
        assert!((up.angle + FRAC_PI_2).abs() < 1e-12);
        assert_eq!(up.distance, 5.0);

        let up_left = angle_from_point((0.0, 0.0), (-1.0, -1.0));
        assert!((up_left.angle - 1.25 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_in_range() {
        let arc = quarter();
        assert!(arc.in_range(70.0, 40.0));
        assert!(!arc.in_range(30.0, 40.0));
        assert!(!arc.in_range(52.0, 48.0));
        assert!(!arc.in_range(95.0, 50.0 - 1.0));
        assert!(!arc.in_group_range(70.0));
    }

    #[test]
    fn test_in_range_wraps_past_start() {
        let arc = Arc::new(0.0, 0.0, PI, 2.0 * PI).with_radii(0.0, 10.0);
        assert!(arc.in_range(-5.0, -1.0));
        assert!(arc.in_range(5.0, -1.0));
        assert!(!arc.in_range(0.0, 5.0));
    }

    #[test]
    fn test_full_circle_matches_everywhere() {
        let arc = Arc::new(0.0, 0.0, -FRAC_PI_2, 1.5 * PI).with_radii(0.0, 10.0);
        for (x, y) in [(5.0, 0.0), (0.0, 5.0), (-5.0, 0.0), (0.0, -5.0)] {
            assert!(arc.in_range(x, y));
        }
    }

    #[test]
    fn test_tooltip_position() {
        let arc = Arc::new(0.0, 0.0, 0.0, FRAC_PI_2).with_radii(10.0, 30.0);
        let pos = arc.tooltip_position();
        let expected = 20.0 * (PI / 4.0).cos();
        assert!((pos.x - expected).abs() < 1e-9);
        assert!((pos.y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_draw_without_border_skips_stroke() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        quarter().draw(&mut canvas);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Arc { .. })), 2);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Stroke)), 0);
    }
}
