//! Radial scale
//!
//! A numeric scale drawn as concentric polygons (or circles) around a
//! center, with one labelled spoke per category.

use crate::options::{Position, RadialScaleOptions};
use crate::radial_layout::{index_angle, solve, RadialLayout};
use crate::range::AxisRange;
use crate::scale::{Margins, MinSize, Scale, ScaleBounds, ScaleGeometry};
use crate::ticks::NumericTicks;
use canvas::{Canvas, TextAlign, TextBaseline};
use std::f64::consts::TAU;
use tracing::trace;

/// Distance between the outermost ring and the point labels
const POINT_LABEL_OFFSET: f64 = 5.0;

/// A polar scale
#[derive(Debug, Clone)]
pub struct RadialScale {
    options: RadialScaleOptions,
    point_labels: Vec<String>,
    label_widths: Vec<f64>,
    values: Vec<f64>,
    ticks: NumericTicks,
    bounds: ScaleBounds,
    x_center: f64,
    y_center: f64,
    drawing_area: f64,
}

impl RadialScale {
    /// Create a new radial scale with one spoke per point label. The point
    /// label callback, if any, rewrites the labels here.
    pub fn new(options: RadialScaleOptions, mut point_labels: Vec<String>) -> Self {
        if let Some(callback) = &options.point_labels.callback {
            callback.apply(&mut point_labels);
        }
        Self {
            options,
            point_labels,
            label_widths: Vec::new(),
            values: Vec::new(),
            ticks: NumericTicks::default(),
            bounds: ScaleBounds::default(),
            x_center: 0.0,
            y_center: 0.0,
            drawing_area: 0.0,
        }
    }

    pub fn options(&self) -> &RadialScaleOptions {
        &self.options
    }

    /// Replace the values the range is computed from
    pub fn set_data<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<f64>>,
    {
        self.values = values
            .into_iter()
            .filter_map(|value| -> Option<f64> { value.into() })
            .filter(|value| value.is_finite())
            .collect();
    }

    pub fn range(&self) -> AxisRange {
        self.ticks.range()
    }

    pub fn ticks(&self) -> &NumericTicks {
        &self.ticks
    }

    /// Tick labels in drawing order
    pub fn tick_labels(&self) -> &[String] {
        self.ticks.labels()
    }

    pub fn point_labels(&self) -> &[String] {
        &self.point_labels
    }

    pub fn point_count(&self) -> usize {
        self.point_labels.len()
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x_center, self.y_center)
    }

    /// Radius of the outermost ring
    pub fn drawing_area(&self) -> f64 {
        self.drawing_area
    }

    /// Distance from the center for `value`; the start value sits at the
    /// center
    pub fn value_to_radius(&self, value: f64) -> f64 {
        self.ticks.fraction(value) * self.drawing_area
    }

    pub fn index_angle(&self, index: usize) -> f64 {
        index_angle(index, self.point_count())
    }

    /// Pixel position of spoke `index` at `distance` from the center
    pub fn point_position(&self, index: usize, distance: f64) -> (f64, f64) {
        let angle = self.index_angle(index);
        (
            self.x_center + angle.cos() * distance,
            self.y_center + angle.sin() * distance,
        )
    }

    /// Pixel position of `value` on spoke `index`
    pub fn point_for_value(&self, index: usize, value: f64) -> (f64, f64) {
        self.point_position(index, self.value_to_radius(value))
    }

    fn update_range(&mut self) {
        let drawing_size = self.bounds.width().min(self.bounds.height()) / 2.0;
        self.ticks = NumericTicks::resolve(&self.options.id, &self.values, drawing_size, &self.options.ticks);
    }

    fn set_scale_size(&mut self) {
        let width = self.bounds.width();
        let height = self.bounds.height();
        if self.options.line_arc {
            let ticks = &self.options.ticks;
            self.drawing_area = (width.min(height) / 2.0 - (ticks.font_size / 2.0 + ticks.backdrop_padding_y)).max(0.0);
            self.x_center = self.bounds.left + width / 2.0;
            self.y_center = self.bounds.top + height / 2.0;
            return;
        }

        let widths = &self.label_widths;
        let layout: RadialLayout = solve(
            self.point_count(),
            width,
            height,
            self.options.point_labels.font_size,
            |index| widths.get(index).copied().unwrap_or(0.0),
        );
        self.drawing_area = layout.radius.max(0.0);
        self.x_center = self.bounds.left + layout.x_center;
        self.y_center = self.bounds.top + layout.y_center;
        trace!(radius = layout.radius, x = self.x_center, y = self.y_center, "radial scale size");
    }

    fn draw_rings(&self, ctx: &mut dyn Canvas) {
        let grid = &self.options.grid_lines;
        let ticks = &self.options.ticks;
        let font = ticks.font();

        for (&tick, label) in self.ticks.values().iter().zip(self.ticks.labels()).skip(1) {
            let radius = self.value_to_radius(tick);
            let y = self.y_center - radius;

            if grid.show && radius > 0.0 {
                ctx.set_stroke_style(&grid.color);
                ctx.set_line_width(grid.line_width);
                ctx.begin_path();
                if self.options.line_arc {
                    ctx.arc(self.x_center, self.y_center, radius, 0.0, TAU, false);
                } else {
                    for index in 0..self.point_count() {
                        let (x, y) = self.point_position(index, radius);
                        if index == 0 {
                            ctx.move_to(x, y);
                        } else {
                            ctx.line_to(x, y);
                        }
                    }
                }
                ctx.close_path();
                ctx.stroke();
            }

            if ticks.show {
                ctx.set_font(&font);
                if ticks.show_label_backdrop {
                    let label_width = ctx.measure_text(label, &font);
                    ctx.set_fill_style(&ticks.backdrop_color);
                    ctx.fill_rect(
                        self.x_center - label_width / 2.0 - ticks.backdrop_padding_x,
                        y - ticks.font_size / 2.0 - ticks.backdrop_padding_y,
                        label_width + ticks.backdrop_padding_x * 2.0,
                        ticks.font_size + ticks.backdrop_padding_y * 2.0,
                    );
                }
                ctx.set_text_align(TextAlign::Center);
                ctx.set_text_baseline(TextBaseline::Middle);
                ctx.set_fill_style(&ticks.font_color);
                ctx.fill_text(label, self.x_center, y);
            }
        }
    }

    fn draw_spokes(&self, ctx: &mut dyn Canvas) {
        let outer = self.drawing_area;
        let angle_lines = &self.options.angle_lines;
        let count = self.point_count();

        if angle_lines.show {
            ctx.set_line_width(angle_lines.line_width);
            ctx.set_stroke_style(&angle_lines.color);
            for index in (0..count).rev() {
                let (x, y) = self.point_position(index, outer);
                ctx.begin_path();
                ctx.move_to(self.x_center, self.y_center);
                ctx.line_to(x, y);
                ctx.stroke();
            }
        }

        let labels = &self.options.point_labels;
        ctx.set_font(&labels.font());
        ctx.set_fill_style(&labels.font_color);
        let quarter = count as f64 / 4.0;
        for (index, label) in self.point_labels.iter().enumerate() {
            let (x, y) = self.point_position(index, outer + POINT_LABEL_OFFSET);
            let twice = index * 2;
            let align = if index == 0 || twice == count {
                TextAlign::Center
            } else if twice < count {
                TextAlign::Left
            } else {
                TextAlign::Right
            };
            let position = index as f64;
            let baseline = if position == quarter || position == quarter * 3.0 {
                TextBaseline::Middle
            } else if position > quarter && position < quarter * 3.0 {
                TextBaseline::Top
            } else {
                TextBaseline::Bottom
            };
            ctx.set_text_align(align);
            ctx.set_text_baseline(baseline);
            ctx.fill_text(label, x, y);
        }
    }
}

impl Scale for RadialScale {
    fn id(&self) -> &str {
        &self.options.id
    }

    fn position(&self) -> Position {
        Position::ChartArea
    }

    fn fit(&mut self, max_width: f64, max_height: f64, _margins: Margins, ctx: &dyn Canvas) -> MinSize {
        self.bounds = self.bounds.resized(max_width, max_height);
        let font = self.options.point_labels.font();
        self.label_widths = self
            .point_labels
            .iter()
            .map(|label| ctx.measure_text(label, &font))
            .collect();
        self.update_range();
        self.set_scale_size();
        MinSize {
            width: max_width,
            height: max_height,
        }
    }

    fn place(&mut self, bounds: ScaleBounds) {
        self.bounds = bounds;
        self.set_scale_size();
    }

    fn geometry(&self) -> ScaleGeometry {
        ScaleGeometry::Radial {
            x_center: self.x_center,
            y_center: self.y_center,
            drawing_radius: self.drawing_area,
        }
    }

    fn draw(&self, ctx: &mut dyn Canvas, _chart_area: &ScaleBounds) {
        if !self.options.display {
            return;
        }
        self.draw_rings(ctx);
        if !self.options.line_arc {
            self.draw_spokes(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radial_layout::initial_radius;
    use canvas::RecordingCanvas;

    fn scale(count: usize) -> RadialScale {
        let labels = (0..count).map(|i| format!("P{}", i)).collect();
        let mut scale = RadialScale::new(RadialScaleOptions::default(), labels);
        scale.set_data([10.0, 40.0, 25.0]);
        scale
    }

    #[test]
    fn test_fit_resolves_geometry() {
        let ctx = RecordingCanvas::new(400.0, 300.0);
        let mut scale = scale(6);
        scale.fit(400.0, 300.0, Margins::default(), &ctx);

        assert!(scale.drawing_area() > 0.0);
        assert!(scale.drawing_area() <= initial_radius(400.0, 300.0, 10.0));
        let (x, y) = scale.center();
        assert_eq!(y, 150.0);
        assert!(x > 100.0 && x < 300.0);
        assert!(scale.range().min <= 10.0);
        assert!(scale.range().max >= 40.0);
    }

    #[test]
    fn test_value_to_radius() {
        let ctx = RecordingCanvas::new(400.0, 300.0);
        let mut scale = scale(5);
        scale.fit(400.0, 300.0, Margins::default(), &ctx);
        let range = scale.range();

        assert_eq!(scale.value_to_radius(range.min), 0.0);
        assert!((scale.value_to_radius(range.max) - scale.drawing_area()).abs() < 1e-9);
    }

    #[test]
    fn test_point_position_top() {
        let ctx = RecordingCanvas::new(400.0, 300.0);
        let mut scale = scale(5);
        scale.fit(400.0, 300.0, Margins::default(), &ctx);
        let (cx, cy) = scale.center();
        let (x, y) = scale.point_position(0, 50.0);

        assert!((x - cx).abs() < 1e-9);
        assert!((y - (cy - 50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_line_arc_area() {
        let ctx = RecordingCanvas::new(400.0, 300.0);
        let mut options = RadialScaleOptions::default();
        options.line_arc = true;
        let mut scale = RadialScale::new(options, Vec::new());
        scale.fit(400.0, 300.0, Margins::default(), &ctx);

        assert_eq!(scale.drawing_area(), 142.0);
        assert_eq!(scale.center(), (200.0, 150.0));
    }

    #[test]
    fn test_place_moves_center() {
        let ctx = RecordingCanvas::new(400.0, 300.0);
        let mut scale = scale(6);
        scale.fit(400.0, 300.0, Margins::default(), &ctx);
        let (x, y) = scale.center();
        scale.place(ScaleBounds::new(10.0, 20.0, 400.0, 300.0));

        assert_eq!(scale.center(), (x + 10.0, y + 20.0));
    }

    fn radar(values: &[f64], configure: impl FnOnce(&mut RadialScaleOptions)) -> RadialScale {
        let mut options = RadialScaleOptions::default();
        configure(&mut options);
        let labels = (1..=5).map(|i| format!("label{}", i)).collect();
        let mut scale = RadialScale::new(options, labels);
        scale.set_data(values.iter().copied());
        let ctx = RecordingCanvas::new(600.0, 600.0);
        scale.fit(600.0, 600.0, Margins::default(), &ctx);
        scale
    }

    fn tick_limit(options: &mut RadialScaleOptions) {
        options.ticks.max_ticks_limit = Some(11);
    }

    #[test]
    fn test_min_and_max_options() {
        let scale = radar(&[1.0, 1.0, 1.0, 2.0, 1.0, 0.0], |options| {
            options.ticks.min = Some(-1010.0);
            options.ticks.max = Some(1010.0);
        });
        assert_eq!(scale.range().min, -1010.0);
        assert_eq!(scale.range().max, 1010.0);
        assert_eq!(scale.tick_labels(), &["-1010", "-1000", "-500", "0", "500", "1000", "1010"]);
    }

    #[test]
    fn test_suggested_min_and_max() {
        let scale = radar(&[1.0, 1.0, 1.0, 2.0, 1.0, 0.0], |options| {
            options.ticks.suggested_min = Some(-10.0);
            options.ticks.suggested_max = Some(10.0);
        });
        assert_eq!(scale.range().min, -10.0);
        assert_eq!(scale.range().max, 10.0);
    }

    #[test]
    fn test_begin_at_zero_generated() {
        let positive = [20.0, 30.0, 40.0, 50.0];
        let negative = [-20.0, -30.0, -40.0, -50.0];

        let scale = radar(&positive, tick_limit);
        assert_eq!(scale.tick_labels(), &["20", "25", "30", "35", "40", "45", "50"]);

        let scale = radar(&positive, |options| {
            tick_limit(options);
            options.ticks.begin_at_zero = true;
        });
        assert_eq!(
            scale.tick_labels(),
            &["0", "5", "10", "15", "20", "25", "30", "35", "40", "45", "50"]
        );

        let scale = radar(&negative, |options| {
            tick_limit(options);
            options.ticks.begin_at_zero = true;
        });
        assert_eq!(
            scale.tick_labels(),
            &["-50", "-45", "-40", "-35", "-30", "-25", "-20", "-15", "-10", "-5", "0"]
        );

        let scale = radar(&negative, tick_limit);
        assert_eq!(scale.tick_labels(), &["-50", "-45", "-40", "-35", "-30", "-25", "-20"]);
    }

    #[test]
    fn test_reverse_ticks_and_distance() {
        let data = [10.0, 5.0, 0.0, 25.0, 78.0];
        let scale = radar(&data, |options| {
            tick_limit(options);
            options.ticks.reverse = true;
        });
        assert_eq!(scale.tick_labels(), &["80", "70", "60", "50", "40", "30", "20", "10", "0"]);
        assert_eq!(scale.ticks().start(), 80.0);
        assert_eq!(scale.ticks().end(), 0.0);
        assert_eq!(scale.value_to_radius(scale.range().min), scale.drawing_area());
        assert_eq!(scale.value_to_radius(scale.range().max), 0.0);

        let forward = radar(&data, tick_limit);
        assert_eq!(forward.value_to_radius(forward.range().min), 0.0);
        assert_eq!(forward.value_to_radius(forward.range().max), forward.drawing_area());
    }

    #[test]
    fn test_max_ticks_limit_and_step_size() {
        let data = [0.5, 1.5, 2.5];
        let expected = ["0.5", "1.0", "1.5", "2.0", "2.5"];
        assert_eq!(radar(&data, tick_limit).tick_labels(), &expected);

        let stepped = radar(&data, |options| {
            tick_limit(options);
            options.ticks.step_size = Some(0.01);
        });
        assert_eq!(stepped.tick_labels(), &expected);

        let bounded = radar(&data, |options| {
            tick_limit(options);
            options.ticks.step_size = Some(0.01);
            options.ticks.min = Some(0.3);
            options.ticks.max = Some(2.8);
        });
        assert_eq!(bounded.tick_labels(), &["0.3", "0.5", "1.0", "1.5", "2.0", "2.5", "2.8"]);
    }

    #[test]
    fn test_tick_callback() {
        let scale = radar(&[10.0, 5.0, 0.0, 25.0, 78.0], |options| {
            tick_limit(options);
            options.ticks = options.ticks.clone().with_callback(|_, index| index.to_string());
        });
        assert_eq!(scale.tick_labels(), &["0", "1", "2", "3", "4", "5", "6", "7", "8"]);
        assert_eq!(scale.point_labels(), &["label1", "label2", "label3", "label4", "label5"]);
    }

    #[test]
    fn test_point_label_callback() {
        let scale = radar(&[10.0, 5.0, 0.0, 25.0, 78.0], |options| {
            options.point_labels = options.point_labels.clone().with_callback(|_, index| index.to_string());
        });
        assert_eq!(scale.point_labels(), &["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_range_ignores_non_finite_data() {
        let labels = (0..8).map(|i| format!("label{}", i)).collect();
        let mut options = RadialScaleOptions::default();
        tick_limit(&mut options);
        let mut scale = RadialScale::new(options, labels);
        scale.set_data([
            Some(50.0),
            Some(60.0),
            Some(f64::NAN),
            Some(70.0),
            None,
            Some(f64::INFINITY),
            Some(f64::NEG_INFINITY),
        ]);
        scale.fit(600.0, 600.0, Margins::default(), &RecordingCanvas::new(600.0, 600.0));
        assert_eq!(scale.range().min, 50.0);
        assert_eq!(scale.range().max, 70.0);
    }

    #[test]
    fn test_empty_data_has_distinct_ends() {
        let scale = radar(&[], tick_limit);
        assert_eq!(scale.range().min, -1.0);
        assert_eq!(scale.range().max, 1.0);
    }

    #[test]
    fn test_id_from_options() {
        assert_eq!(scale(3).id(), "scale");
        let custom = radar(&[1.0], |options| options.id = "r".to_string());
        assert_eq!(custom.id(), "r");
    }

    #[test]
    fn test_tiny_canvas_collapses_area() {
        let ctx = RecordingCanvas::new(40.0, 20.0);
        let mut scale = scale(5);
        scale.fit(40.0, 20.0, Margins::default(), &ctx);
        assert_eq!(scale.drawing_area(), 0.0);
        let (x, y) = scale.center();
        assert!(x.is_finite());
        assert_eq!(y, 10.0);
    }

    #[test]
    fn test_draw_labels() {
        let mut ctx = RecordingCanvas::new(400.0, 300.0);
        let mut scale = scale(6);
        scale.fit(400.0, 300.0, Margins::default(), &ctx);
        scale.draw(&mut ctx, &ScaleBounds::new(0.0, 0.0, 400.0, 300.0));

        let expected = scale.tick_labels().len() - 1 + scale.point_count();
        assert_eq!(ctx.texts().len(), expected);
    }
}
