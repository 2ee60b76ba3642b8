//! Radial scale geometry
//!
//! Finds the largest radius and the center point at which the point labels
//! around a radial scale stay inside the canvas.

use std::f64::consts::{FRAC_PI_2, TAU};
use tracing::trace;

/// Gap between the top/bottom of the canvas and the label ring
pub const RADIAL_EDGE_PADDING: f64 = 5.0;

/// Extra width added to every measured point label
pub const POINT_LABEL_PADDING: f64 = 5.0;

/// Denominators closer to zero than this produce no radius reduction
const MIN_DENOMINATOR: f64 = 1e-10;

/// Resolved radial geometry
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadialLayout {
    pub radius: f64,
    pub x_center: f64,
    pub y_center: f64,
}

/// Angle of point `index` out of `point_count`; index 0 is at the top and
/// indices proceed clockwise
pub fn index_angle(index: usize, point_count: usize) -> f64 {
    if point_count == 0 {
        return -FRAC_PI_2;
    }
    index as f64 * (TAU / point_count as f64) - FRAC_PI_2
}

/// Offset from the center of point `index` at `distance`
pub fn point_offset(index: usize, point_count: usize, distance: f64) -> (f64, f64) {
    let angle = index_angle(index, point_count);
    (angle.cos() * distance, angle.sin() * distance)
}

/// Largest radius before label protrusion is taken into account
pub fn initial_radius(width: f64, height: f64, font_size: f64) -> f64 {
    (height / 2.0 - font_size - RADIAL_EDGE_PADDING).min(width / 2.0)
}

#[derive(Debug, Clone, Copy)]
struct Extent {
    position: f64,
    index: Option<usize>,
}

/// Solve radius and center for `point_count` labels on a `width` x `height`
/// canvas. `label_width` measures the label at an index.
///
/// The radius never exceeds [`initial_radius`]. On a canvas too small for
/// the point labels that bound is negative and so is the solved radius;
/// callers drawing with it clamp to zero.
pub fn solve<F>(point_count: usize, width: f64, height: f64, font_size: f64, label_width: F) -> RadialLayout
where
    F: Fn(usize) -> f64,
{
    let largest = initial_radius(width, height, font_size);
    let x_start = width / 2.0;

    let mut right = Extent {
        position: width,
        index: None,
    };
    let mut left = Extent {
        position: 0.0,
        index: None,
    };

    for index in 0..point_count {
        let x = x_start + point_offset(index, point_count, largest).0;
        let text_width = label_width(index) + POINT_LABEL_PADDING;
        let twice = index * 2;

        if index == 0 || twice == point_count {
            let half = text_width / 2.0;
            if x + half > right.position {
                right = Extent {
                    position: x + half,
                    index: Some(index),
                };
            }
            if x - half < left.position {
                left = Extent {
                    position: x - half,
                    index: Some(index),
                };
            }
        } else if twice < point_count {
            if x + text_width > right.position {
                right = Extent {
                    position: x + text_width,
                    index: Some(index),
                };
            }
        } else if x - text_width < left.position {
            left = Extent {
                position: x - text_width,
                index: Some(index),
            };
        }
    }

    let protrusion_right = (right.position - width).ceil();
    let protrusion_left = left.position;
    let reduction_right = radius_reduction(protrusion_right, right.index, point_count);
    let reduction_left = radius_reduction(protrusion_left, left.index, point_count);

    let radius = (largest - (reduction_left + reduction_right) / 2.0).min(largest);
    let max_right = width - reduction_right - radius;
    let max_left = reduction_left + radius;

    trace!(radius, reduction_left, reduction_right, "solved radial layout");
    RadialLayout {
        radius,
        x_center: (max_left + max_right) / 2.0,
        y_center: height / 2.0,
    }
}

fn radius_reduction(protrusion: f64, index: Option<usize>, point_count: usize) -> f64 {
    let Some(index) = index else {
        return 0.0;
    };
    let denominator = (index_angle(index, point_count) + FRAC_PI_2).sin();
    if denominator.abs() < MIN_DENOMINATOR {
        return 0.0;
    }
    let reduction = protrusion / denominator;
    if reduction.is_finite() {
        reduction.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_index_angles() {
        assert!((index_angle(0, 4) + FRAC_PI_2).abs() < 1e-12);
        assert!(index_angle(1, 4).abs() < 1e-12);
        assert!((index_angle(2, 4) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_point_offset_top() {
        let (x, y) = point_offset(0, 6, 100.0);
        assert!(x.abs() < 1e-9);
        assert!((y + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_narrow_labels_keep_full_radius() {
        let layout = solve(6, 400.0, 300.0, 10.0, |_| 10.0);
        assert_eq!(layout.radius, initial_radius(400.0, 300.0, 10.0));
        assert_eq!(layout.x_center, 200.0);
        assert_eq!(layout.y_center, 150.0);
    }

    #[test]
    fn test_wide_labels_shrink_radius() {
        let layout = solve(4, 300.0, 300.0, 10.0, |_| 80.0);
        let bound = initial_radius(300.0, 300.0, 10.0);
        assert!(layout.radius < bound);
        assert!(layout.radius > 0.0);
        assert!((layout.x_center - 150.0).abs() < 1.0);
    }

    #[test]
    fn test_one_sided_label_moves_center() {
        let layout = solve(4, 300.0, 300.0, 10.0, |i| if i == 1 { 120.0 } else { 1.0 });
        assert!(layout.x_center < 150.0);
    }

    #[test]
    fn test_no_points() {
        let layout = solve(0, 200.0, 200.0, 10.0, |_| 0.0);
        assert_eq!(layout.radius, initial_radius(200.0, 200.0, 10.0));
    }

    #[test]
    fn test_tiny_canvas_keeps_bound() {
        let bound = initial_radius(40.0, 20.0, 10.0);
        assert_eq!(bound, -5.0);
        let layout = solve(5, 40.0, 20.0, 10.0, |_| 30.0);
        assert!(layout.radius <= bound);
        assert!(layout.x_center.is_finite());
        assert_eq!(layout.y_center, 10.0);
    }

    proptest! {
        #[test]
        fn prop_radius_within_bound(
            widths in proptest::collection::vec(0.0f64..400.0, 0..16),
            width in 1.0f64..1200.0,
            height in 1.0f64..1200.0,
            font_size in 6.0f64..20.0,
        ) {
            let layout = solve(widths.len(), width, height, font_size, |i| widths[i]);
            let bound = (height / 2.0 - font_size - 5.0).min(width / 2.0);
            prop_assert!(layout.radius <= bound);
            prop_assert!(layout.radius.is_finite());
            prop_assert!(layout.x_center.is_finite());
            prop_assert_eq!(layout.y_center, height / 2.0);
        }
    }
}
