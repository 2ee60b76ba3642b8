//! Box layout
//!
//! Scales are boxes stacked against the edges of the canvas; whatever is
//! left in the middle is the chart area. Every scale is fit before it is
//! placed, and fitting writes the scale's own bounds, so a box's size is
//! known to the boxes fit after it:
//!
//! 1. Vertical boxes are fit against half the chart height.
//! 2. Horizontal boxes are fit to the width the vertical boxes left over,
//!    with the vertical widths passed as margins.
//! 3. Vertical boxes are fit again to the height the horizontal boxes left.
//!
//! Boxes positioned on the chart area are fit last, to the area itself.

use canvas::Canvas;
use scales::{Margins, Position, ScaleBounds};
use tracing::trace;

use crate::axes::ChartScale;

/// Space kept free around the boxes
pub fn edge_padding(size: f64) -> f64 {
    if size > 30.0 {
        5.0
    } else {
        2.0
    }
}

#[derive(Default)]
struct Sides {
    left: Vec<usize>,
    right: Vec<usize>,
    top: Vec<usize>,
    bottom: Vec<usize>,
    area: Vec<usize>,
}

impl Sides {
    fn of(scales: &[ChartScale]) -> Self {
        let mut sides = Self::default();
        for (index, scale) in scales.iter().enumerate() {
            let side = match scale.scale().position() {
                Position::Left => &mut sides.left,
                Position::Right => &mut sides.right,
                Position::Top => &mut sides.top,
                Position::Bottom => &mut sides.bottom,
                Position::ChartArea => &mut sides.area,
            };
            side.push(index);
        }
        sides
    }

    fn vertical(&self) -> impl Iterator<Item = usize> + '_ {
        self.left.iter().chain(&self.right).copied()
    }

    fn horizontal(&self) -> impl Iterator<Item = usize> + '_ {
        self.top.iter().chain(&self.bottom).copied()
    }
}

fn total(indices: &[usize], sizes: &[f64]) -> f64 {
    indices.iter().map(|&i| sizes[i]).sum()
}

/// Fit and place every scale on a `width` x `height` canvas and return the
/// chart area
pub fn layout_boxes(scales: &mut [ChartScale], width: f64, height: f64, canvas: &dyn Canvas) -> ScaleBounds {
    let x_padding = edge_padding(width);
    let y_padding = edge_padding(height);
    let chart_width = (width - 2.0 * x_padding).max(0.0);
    let chart_height = (height - 2.0 * y_padding).max(0.0);

    let sides = Sides::of(scales);
    let vertical_count = (sides.left.len() + sides.right.len()).max(1) as f64;
    let horizontal_count = (sides.top.len() + sides.bottom.len()).max(1) as f64;
    // The chart area keeps at least half of each dimension
    let vertical_box_width = (chart_width / 2.0) / vertical_count;
    let horizontal_box_height = (chart_height / 2.0) / horizontal_count;

    let mut widths = vec![0.0; scales.len()];
    let mut heights = vec![0.0; scales.len()];

    for i in sides.vertical() {
        let size = scales[i]
            .scale_mut()
            .fit(vertical_box_width, chart_height / 2.0, Margins::default(), canvas);
        widths[i] = size.width;
    }
    let mut left_width = total(&sides.left, &widths);
    let mut right_width = total(&sides.right, &widths);

    let inner_width = (chart_width - left_width - right_width).max(0.0);
    let margins = Margins::new(left_width, right_width, 0.0, 0.0);
    for i in sides.horizontal() {
        let size = scales[i]
            .scale_mut()
            .fit(inner_width, horizontal_box_height, margins, canvas);
        heights[i] = size.height;
    }
    let top_height = total(&sides.top, &heights);
    let bottom_height = total(&sides.bottom, &heights);

    let inner_height = (chart_height - top_height - bottom_height).max(0.0);
    let margins = Margins::new(0.0, 0.0, top_height, bottom_height);
    for i in sides.vertical() {
        let size = scales[i]
            .scale_mut()
            .fit(vertical_box_width, inner_height, margins, canvas);
        widths[i] = size.width;
    }
    left_width = total(&sides.left, &widths);
    right_width = total(&sides.right, &widths);
    let inner_width = (chart_width - left_width - right_width).max(0.0);

    let area_left = x_padding + left_width;
    let area_top = y_padding + top_height;

    let mut x = x_padding;
    for &i in &sides.left {
        scales[i].scale_mut().place(ScaleBounds::new(x, area_top, widths[i], inner_height));
        x += widths[i];
    }
    let mut x = area_left + inner_width;
    for &i in &sides.right {
        scales[i].scale_mut().place(ScaleBounds::new(x, area_top, widths[i], inner_height));
        x += widths[i];
    }
    let mut y = y_padding;
    for &i in &sides.top {
        scales[i].scale_mut().place(ScaleBounds::new(area_left, y, inner_width, heights[i]));
        y += heights[i];
    }
    let mut y = area_top + inner_height;
    for &i in &sides.bottom {
        scales[i].scale_mut().place(ScaleBounds::new(area_left, y, inner_width, heights[i]));
        y += heights[i];
    }

    let chart_area = ScaleBounds::new(area_left, area_top, inner_width, inner_height);
    let margins = Margins::new(left_width, right_width, top_height, bottom_height);
    for &i in &sides.area {
        let scale = scales[i].scale_mut();
        scale.fit(inner_width, inner_height, margins, canvas);
        scale.place(chart_area);
    }

    trace!(
        left = chart_area.left,
        top = chart_area.top,
        width = chart_area.width(),
        height = chart_area.height(),
        "chart area"
    );
    chart_area
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas::RecordingCanvas;
    use scales::{
        CategoryScale, CategoryScaleOptions, LinearScale, LinearScaleOptions, RadialScale, RadialScaleOptions,
        Scale, ScaleGeometry,
    };

    fn labels() -> Vec<String> {
        ["January", "February", "March"].iter().map(|s| s.to_string()).collect()
    }

    fn bar_scales() -> Vec<ChartScale> {
        let mut linear = LinearScale::new(LinearScaleOptions::default());
        linear.set_data([0.0, 50.0, 100.0]);
        vec![
            ChartScale::Category(CategoryScale::new(CategoryScaleOptions::default(), labels())),
            ChartScale::Linear(linear),
        ]
    }

    #[test]
    fn test_boxes_surround_chart_area() {
        let canvas = RecordingCanvas::new(400.0, 300.0);
        let mut scales = bar_scales();
        let area = layout_boxes(&mut scales, 400.0, 300.0, &canvas);

        let x = scales[0].as_category().unwrap().bounds();
        let y = scales[1].as_linear().unwrap().bounds();
        assert!(y.width() > 0.0);
        assert!(x.height() > 0.0);
        assert_eq!(y.left, 5.0);
        assert_eq!(y.right, area.left);
        assert_eq!(y.top, area.top);
        assert_eq!(y.bottom, area.bottom);
        assert_eq!(x.left, area.left);
        assert_eq!(x.right, area.right);
        assert_eq!(x.top, area.bottom);
        assert!((x.bottom - 295.0).abs() < 1e-9);
        assert_eq!(area.right, 395.0);
        assert_eq!(area.top, 5.0);
    }

    #[test]
    fn test_chart_area_keeps_half() {
        let canvas = RecordingCanvas::new(400.0, 300.0);
        let mut scales = bar_scales();
        let area = layout_boxes(&mut scales, 400.0, 300.0, &canvas);
        assert!(area.width() >= 195.0);
        assert!(area.height() >= 145.0);
    }

    #[test]
    fn test_no_boxes_fills_padded_canvas() {
        let canvas = RecordingCanvas::new(200.0, 100.0);
        let area = layout_boxes(&mut [], 200.0, 100.0, &canvas);
        assert_eq!(area, ScaleBounds::new(5.0, 5.0, 190.0, 90.0));
    }

    #[test]
    fn test_chart_area_scale_gets_area() {
        let canvas = RecordingCanvas::new(300.0, 300.0);
        let mut scales = vec![ChartScale::Radial(RadialScale::new(RadialScaleOptions::default(), labels()))];
        let area = layout_boxes(&mut scales, 300.0, 300.0, &canvas);
        match scales[0].scale().geometry() {
            ScaleGeometry::Radial {
                x_center,
                y_center,
                drawing_radius,
            } => {
                assert!(drawing_radius > 0.0);
                assert!(drawing_radius <= area.height() / 2.0);
                assert!(x_center > area.left && x_center < area.right);
                assert!((y_center - (area.top + area.height() / 2.0)).abs() < 1e-9);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_right_box_sits_after_area() {
        let canvas = RecordingCanvas::new(400.0, 300.0);
        let mut right = LinearScale::new(LinearScaleOptions {
            id: "right".to_string(),
            position: Position::Right,
            ..LinearScaleOptions::default()
        });
        right.set_data([1.0, 2.0]);
        let mut scales = bar_scales();
        scales.push(ChartScale::Linear(right));
        let area = layout_boxes(&mut scales, 400.0, 300.0, &canvas);
        let bounds = scales[2].as_linear().unwrap().bounds();
        assert_eq!(bounds.left, area.right);
        assert!((bounds.right - 395.0).abs() < 1e-9);
    }
}
