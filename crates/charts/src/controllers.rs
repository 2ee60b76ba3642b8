//! Dataset controllers
//!
//! A controller turns one dataset into view-state targets for its elements:
//! pixel geometry from the chart's scales plus the style options every
//! element of the dataset reads. The chart applies the targets through the
//! animations coordinator.

use std::f64::consts::{FRAC_PI_2, TAU};

use animation::{AnimValue, PropertyMap};
use chart_config::ChartOptions;
use elements::{keys, line_control_points, ControlPoints, DataElementKind};
use scales::{LinearScale, ScaleBounds};
use serde_json::Value;

use crate::axes::{AxisDirection, ScaleSet};
use crate::error::{ChartError, ChartResult};
use crate::model::{ChartData, ColorSpec, Dataset};

/// Targets of one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementTarget {
    /// Geometry, animated towards
    pub values: PropertyMap,
    /// Style, shared between elements where equal
    pub options: PropertyMap,
    /// Where a newly created element starts before animating to `values`
    pub reset: PropertyMap,
}

impl ElementTarget {
    fn set(&mut self, key: &str, value: impl Into<AnimValue>) -> &mut Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    fn option(&mut self, key: &str, value: impl Into<AnimValue>) -> &mut Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    fn reset_to(&mut self, key: &str, value: impl Into<AnimValue>) -> &mut Self {
        self.reset.insert(key.to_string(), value.into());
        self
    }

    fn control_points(&mut self, points: ControlPoints) -> &mut Self {
        self.set(keys::CONTROL_POINT_PREVIOUS_X, points.previous_x)
            .set(keys::CONTROL_POINT_PREVIOUS_Y, points.previous_y)
            .set(keys::CONTROL_POINT_NEXT_X, points.next_x)
            .set(keys::CONTROL_POINT_NEXT_Y, points.next_y)
    }

    fn control_points_reset(&mut self, x: f64, y: f64) -> &mut Self {
        self.reset_to(keys::CONTROL_POINT_PREVIOUS_X, x)
            .reset_to(keys::CONTROL_POINT_PREVIOUS_Y, y)
            .reset_to(keys::CONTROL_POINT_NEXT_X, x)
            .reset_to(keys::CONTROL_POINT_NEXT_Y, y)
    }

    /// Initial values of a new element
    pub fn initial_values(&self) -> PropertyMap {
        let mut initial = self.values.clone();
        initial.extend(self.reset.iter().map(|(k, v)| (k.clone(), v.clone())));
        initial
    }
}

/// Targets of one dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetTargets {
    pub elements: Vec<ElementTarget>,
    /// The line through the elements, for line-like charts
    pub line: Option<ElementTarget>,
}

/// What a controller reads while updating
pub struct ControllerContext<'a> {
    pub data: &'a ChartData,
    pub options: &'a ChartOptions,
    /// The full resolved options tree, for settings without a typed view
    pub resolved: &'a Value,
    pub scales: &'a ScaleSet,
    pub chart_area: ScaleBounds,
}

impl<'a> ControllerContext<'a> {
    fn dataset(&self, index: usize) -> ChartResult<&'a Dataset> {
        self.data
            .datasets
            .get(index)
            .ok_or_else(|| ChartError::InvalidData(format!("no dataset at index {index}")))
    }

    fn y_axis(&self, dataset: &Dataset) -> ChartResult<&'a LinearScale> {
        self.scales
            .axis(AxisDirection::Y, dataset.y_axis_id.as_deref())
            .and_then(|scale| scale.as_linear())
            .ok_or_else(|| ChartError::InvalidData(format!("dataset '{}' needs a linear y axis", dataset.label)))
    }

    /// Position among visible datasets and their count
    fn slot(&self, index: usize) -> (usize, usize, Vec<usize>) {
        let visible = self.data.visible_indices();
        let position = visible.iter().position(|&i| i == index).unwrap_or(0);
        (position, visible.len().max(1), visible)
    }

    fn animation_flag(&self, name: &str) -> bool {
        self.resolved
            .get("animation")
            .and_then(|animation| animation.get(name))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn clamp(&self, mut points: ControlPoints) -> ControlPoints {
        let area = self.chart_area;
        points.clamp_to(area.left, area.top, area.right, area.bottom);
        points
    }
}

/// Behavior of one chart type's datasets
pub trait DatasetController {
    fn element_kind(&self) -> DataElementKind;

    /// Line-like charts draw a line through their points
    fn draws_line(&self) -> bool {
        false
    }

    /// The line joins its last point back to the first
    fn closes_line(&self) -> bool {
        false
    }

    /// Targets for dataset `index`
    fn update(&self, ctx: &ControllerContext<'_>, index: usize) -> ChartResult<DatasetTargets>;
}

fn color(spec: Option<&ColorSpec>, index: usize, fallback: &str) -> String {
    spec.and_then(|spec| spec.at(index)).unwrap_or(fallback).to_string()
}

fn style(target: &mut ElementTarget, background: String, border: String, border_width: f64) {
    target
        .option(keys::BACKGROUND_COLOR, background)
        .option(keys::BORDER_COLOR, border)
        .option(keys::BORDER_WIDTH, border_width);
}

/// Value pixel of `value`, stacked on the datasets before `index` when the
/// axis stacks
fn value_pixel(ctx: &ControllerContext<'_>, y: &LinearScale, visible: &[usize], index: usize, at: usize, value: f64) -> (f64, f64) {
    if y.options().stacked {
        let base = ctx.data.stack_base(visible, index, at, value);
        (y.pixel_for_value(base + value), y.pixel_for_value(base))
    } else {
        (y.pixel_for_value(value), y.base_pixel())
    }
}

/// Vertical bars on a category x axis
#[derive(Debug, Clone, Copy, Default)]
pub struct BarController;

impl DatasetController for BarController {
    fn element_kind(&self) -> DataElementKind {
        DataElementKind::Rectangle
    }

    fn update(&self, ctx: &ControllerContext<'_>, index: usize) -> ChartResult<DatasetTargets> {
        let dataset = ctx.dataset(index)?;
        let x = ctx
            .scales
            .axis(AxisDirection::X, dataset.x_axis_id.as_deref())
            .and_then(|scale| scale.as_category())
            .ok_or_else(|| ChartError::InvalidData(format!("dataset '{}' needs a category x axis", dataset.label)))?;
        let y = ctx.y_axis(dataset)?;
        let (position, count, visible) = ctx.slot(index);
        let rectangle = &ctx.options.elements.rectangle;
        let width = x.bar_width(count);

        let elements = (0..dataset.data.len())
            .map(|i| {
                let (top, base) = match dataset.value(i) {
                    Some(value) => value_pixel(ctx, y, &visible, index, i, value),
                    None => (y.base_pixel(), y.base_pixel()),
                };
                let mut target = ElementTarget::default();
                target
                    .set(keys::X, x.bar_x(i, position, count))
                    .set(keys::Y, top)
                    .set(keys::BASE, base)
                    .set(keys::WIDTH, width)
                    .reset_to(keys::Y, base);
                style(
                    &mut target,
                    color(dataset.background_color.as_ref(), i, &rectangle.background_color),
                    color(dataset.border_color.as_ref(), i, &rectangle.border_color),
                    dataset.border_width.unwrap_or(rectangle.border_width),
                );
                target
            })
            .collect();

        Ok(DatasetTargets { elements, line: None })
    }
}

fn point_options(target: &mut ElementTarget, ctx: &ControllerContext<'_>, dataset: &Dataset, i: usize) {
    let point = &ctx.options.elements.point;
    target
        .option(keys::RADIUS, dataset.point_radius.unwrap_or(point.radius))
        .option(keys::HIT_RADIUS, point.hit_radius);
    style(
        target,
        color(dataset.background_color.as_ref(), i, &point.background_color),
        color(dataset.border_color.as_ref(), i, &point.border_color),
        point.border_width,
    );
}

fn line_target(ctx: &ControllerContext<'_>, dataset: &Dataset, scale_zero: f64) -> ElementTarget {
    let line = &ctx.options.elements.line;
    let mut target = ElementTarget::default();
    target
        .set(keys::SCALE_ZERO, scale_zero)
        .option(keys::TENSION, dataset.tension.unwrap_or(line.tension))
        .option(keys::FILL, dataset.fill.unwrap_or(line.fill));
    style(
        &mut target,
        color(dataset.background_color.as_ref(), 0, &line.background_color),
        color(dataset.border_color.as_ref(), 0, &line.border_color),
        dataset.border_width.unwrap_or(line.border_width),
    );
    target
}

/// Spline control points for the non-skipped entries of `positions`,
/// clamped to the chart area. Skipped entries keep their own position.
fn control_points(ctx: &ControllerContext<'_>, positions: &[Option<(f64, f64)>], tension: f64, closed: bool) -> Vec<ControlPoints> {
    let present: Vec<(f64, f64)> = positions.iter().flatten().copied().collect();
    let mut computed = line_control_points(&present, tension, closed).into_iter();
    positions
        .iter()
        .map(|position| match position {
            Some(_) => computed.next().map(|cp| ctx.clamp(cp)).unwrap_or_default(),
            None => ControlPoints::default(),
        })
        .collect()
}

/// Points joined by a line on a category x axis
#[derive(Debug, Clone, Copy, Default)]
pub struct LineController;

impl DatasetController for LineController {
    fn element_kind(&self) -> DataElementKind {
        DataElementKind::Point
    }

    fn draws_line(&self) -> bool {
        true
    }

    fn update(&self, ctx: &ControllerContext<'_>, index: usize) -> ChartResult<DatasetTargets> {
        let dataset = ctx.dataset(index)?;
        let x = ctx
            .scales
            .axis(AxisDirection::X, dataset.x_axis_id.as_deref())
            .ok_or_else(|| ChartError::InvalidData(format!("dataset '{}' needs an x axis", dataset.label)))?;
        let y = ctx.y_axis(dataset)?;
        let (_, _, visible) = ctx.slot(index);
        let zero = y.base_pixel();
        let tension = dataset.tension.unwrap_or(ctx.options.elements.line.tension);

        let positions: Vec<Option<(f64, f64)>> = (0..dataset.data.len())
            .map(|i| {
                dataset
                    .value(i)
                    .map(|value| (x.pixel_for_index(i), value_pixel(ctx, y, &visible, index, i, value).0))
            })
            .collect();
        let curves = control_points(ctx, &positions, tension, false);

        let elements = positions
            .iter()
            .zip(curves)
            .enumerate()
            .map(|(i, (position, curve))| {
                let (px, py) = position.unwrap_or((x.pixel_for_index(i), zero));
                let curve = if position.is_some() { curve } else { ControlPoints::at(px, py) };
                let mut target = ElementTarget::default();
                target
                    .set(keys::X, px)
                    .set(keys::Y, py)
                    .set(keys::SKIP, position.is_none())
                    .control_points(curve)
                    .reset_to(keys::Y, zero)
                    .reset_to(keys::CONTROL_POINT_PREVIOUS_Y, zero)
                    .reset_to(keys::CONTROL_POINT_NEXT_Y, zero);
                point_options(&mut target, ctx, dataset, i);
                target
            })
            .collect();

        let line = ctx.options.show_lines.then(|| line_target(ctx, dataset, zero));
        Ok(DatasetTargets { elements, line })
    }
}

/// A closed line around a radial scale
#[derive(Debug, Clone, Copy, Default)]
pub struct RadarController;

impl DatasetController for RadarController {
    fn element_kind(&self) -> DataElementKind {
        DataElementKind::Point
    }

    fn draws_line(&self) -> bool {
        true
    }

    fn closes_line(&self) -> bool {
        true
    }

    fn update(&self, ctx: &ControllerContext<'_>, index: usize) -> ChartResult<DatasetTargets> {
        let dataset = ctx.dataset(index)?;
        let scale = ctx
            .scales
            .radial()
            .ok_or_else(|| ChartError::InvalidData("radar charts need a radial scale".to_string()))?;
        let (cx, cy) = scale.center();
        let tension = dataset.tension.unwrap_or(ctx.options.elements.line.tension);

        let positions: Vec<Option<(f64, f64)>> = (0..dataset.data.len())
            .map(|i| dataset.value(i).map(|value| scale.point_for_value(i, value)))
            .collect();
        let curves = control_points(ctx, &positions, tension, true);

        let elements = positions
            .iter()
            .zip(curves)
            .enumerate()
            .map(|(i, (position, curve))| {
                let (px, py) = position.unwrap_or((cx, cy));
                let curve = if position.is_some() { curve } else { ControlPoints::at(px, py) };
                let mut target = ElementTarget::default();
                target
                    .set(keys::X, px)
                    .set(keys::Y, py)
                    .set(keys::SKIP, position.is_none())
                    .control_points(curve)
                    .reset_to(keys::X, cx)
                    .reset_to(keys::Y, cy)
                    .control_points_reset(cx, cy);
                point_options(&mut target, ctx, dataset, i);
                target
            })
            .collect();

        Ok(DatasetTargets {
            elements,
            line: Some(line_target(ctx, dataset, cy)),
        })
    }
}

/// Concentric rings of arcs, one ring per visible dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct DoughnutController;

impl DatasetController for DoughnutController {
    fn element_kind(&self) -> DataElementKind {
        DataElementKind::Arc
    }

    fn update(&self, ctx: &ControllerContext<'_>, index: usize) -> ChartResult<DatasetTargets> {
        let dataset = ctx.dataset(index)?;
        let area = ctx.chart_area;
        let arc = &ctx.options.elements.arc;
        let (ring, rings, _) = ctx.slot(index);

        let outer_limit = (area.width().min(area.height()) / 2.0 - arc.border_width / 2.0).max(0.0);
        let cutout = ctx.options.cutout_percentage.clamp(0.0, 100.0) / 100.0;
        let ring_width = outer_limit * (1.0 - cutout) / rings as f64;
        let outer = outer_limit - ring_width * ring as f64;
        let inner = (outer - ring_width).max(0.0);
        let center = (area.left + area.width() / 2.0, area.top + area.height() / 2.0);

        let total: f64 = (0..dataset.data.len()).filter_map(|i| dataset.value(i)).map(f64::abs).sum();
        let animate_rotate = ctx.animation_flag("animateRotate");
        let animate_scale = ctx.animation_flag("animateScale");

        let mut start = -FRAC_PI_2;
        let elements = (0..dataset.data.len())
            .map(|i| {
                let circumference = match dataset.value(i) {
                    Some(value) if total > 0.0 => TAU * value.abs() / total,
                    _ => 0.0,
                };
                let mut target = ElementTarget::default();
                target
                    .set(keys::X, center.0)
                    .set(keys::Y, center.1)
                    .set(keys::START_ANGLE, start)
                    .set(keys::END_ANGLE, start + circumference)
                    .set(keys::INNER_RADIUS, inner)
                    .set(keys::OUTER_RADIUS, outer);
                if animate_rotate {
                    target.reset_to(keys::START_ANGLE, -FRAC_PI_2).reset_to(keys::END_ANGLE, -FRAC_PI_2);
                }
                if animate_scale {
                    target.reset_to(keys::INNER_RADIUS, 0.0).reset_to(keys::OUTER_RADIUS, 0.0);
                }
                style(
                    &mut target,
                    color(dataset.background_color.as_ref(), i, &arc.background_color),
                    color(dataset.border_color.as_ref(), i, &arc.border_color),
                    dataset.border_width.unwrap_or(arc.border_width),
                );
                start += circumference;
                target
            })
            .collect();

        Ok(DatasetTargets { elements, line: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_boxes;
    use crate::model::Dataset;
    use canvas::RecordingCanvas;
    use chart_config::{DefaultsRegistry, OptionsResolver};
    use serde_json::json;

    struct Fixture {
        data: ChartData,
        options: ChartOptions,
        resolved: Value,
        scales: ScaleSet,
        area: ScaleBounds,
    }

    impl Fixture {
        fn new(chart_type: &str, user: Value, data: ChartData) -> Self {
            let resolved = DefaultsRegistry::standard().resolve(chart_type, &user).unwrap();
            let options = ChartOptions::from_resolved(&resolved).unwrap();
            let mut scales = ScaleSet::build(&options, &data);
            let canvas = RecordingCanvas::new(400.0, 300.0);
            let area = layout_boxes(scales.scales_mut(), 400.0, 300.0, &canvas);
            Self {
                data,
                options,
                resolved,
                scales,
                area,
            }
        }

        fn ctx(&self) -> ControllerContext<'_> {
            ControllerContext {
                data: &self.data,
                options: &self.options,
                resolved: &self.resolved,
                scales: &self.scales,
                chart_area: self.area,
            }
        }

        fn linear(&self) -> &LinearScale {
            self.scales.axis(AxisDirection::Y, None).unwrap().as_linear().unwrap()
        }
    }

    fn number(target: &ElementTarget, key: &str) -> f64 {
        target.values[key].as_number().unwrap()
    }

    #[test]
    fn test_grouped_bars_sit_side_by_side() {
        let data = ChartData::new(["a", "b"])
            .with_dataset(Dataset::new("one", [10.0, 20.0]))
            .with_dataset(Dataset::new("two", [5.0, 15.0]));
        let fixture = Fixture::new("bar", json!({}), data);
        let first = BarController.update(&fixture.ctx(), 0).unwrap();
        let second = BarController.update(&fixture.ctx(), 1).unwrap();

        let a = &first.elements[0];
        let b = &second.elements[0];
        assert!(number(b, keys::X) > number(a, keys::X));
        assert_eq!(number(a, keys::WIDTH), number(b, keys::WIDTH));
        assert_eq!(number(a, keys::Y), fixture.linear().pixel_for_value(10.0));
        assert_eq!(number(a, keys::BASE), fixture.linear().base_pixel());
        assert_eq!(a.reset[keys::Y], AnimValue::from(number(a, keys::BASE)));
    }

    #[test]
    fn test_stacked_bars_share_x() {
        let data = ChartData::new(["a"])
            .with_dataset(Dataset::new("one", [10.0]))
            .with_dataset(Dataset::new("two", [5.0]));
        let user = json!({ "scales": { "xAxes": [{ "stacked": true }], "yAxes": [{ "stacked": true }] } });
        let fixture = Fixture::new("bar", user, data);
        let first = BarController.update(&fixture.ctx(), 0).unwrap();
        let second = BarController.update(&fixture.ctx(), 1).unwrap();

        assert_eq!(number(&first.elements[0], keys::X), number(&second.elements[0], keys::X));
        assert_eq!(number(&second.elements[0], keys::BASE), number(&first.elements[0], keys::Y));
        assert_eq!(number(&second.elements[0], keys::Y), fixture.linear().pixel_for_value(15.0));
    }

    #[test]
    fn test_bar_colors_per_value() {
        let data = ChartData::new(["a", "b"]).with_dataset(
            Dataset::new("one", [1.0, 2.0]).with_background(ColorSpec::PerValue(vec!["#f00".into(), "#0f0".into()])),
        );
        let fixture = Fixture::new("bar", json!({}), data);
        let targets = BarController.update(&fixture.ctx(), 0).unwrap();
        assert_eq!(targets.elements[0].options[keys::BACKGROUND_COLOR], AnimValue::from("#f00"));
        assert_eq!(targets.elements[1].options[keys::BACKGROUND_COLOR], AnimValue::from("#0f0"));
    }

    #[test]
    fn test_line_skips_absent_values() {
        let data = ChartData::new(["a", "b", "c"])
            .with_dataset(Dataset::new("one", [0.0]).with_values(vec![Some(1.0), None, Some(3.0)]));
        let fixture = Fixture::new("line", json!({}), data);
        let targets = LineController.update(&fixture.ctx(), 0).unwrap();

        assert_eq!(targets.elements[1].values[keys::SKIP], AnimValue::from(true));
        assert_eq!(targets.elements[0].values[keys::SKIP], AnimValue::from(false));
        let line = targets.line.unwrap();
        assert_eq!(line.options[keys::FILL], AnimValue::from(true));
        assert_eq!(number(&line, keys::SCALE_ZERO), fixture.linear().base_pixel());
    }

    #[test]
    fn test_line_control_points_stay_in_area() {
        let data = ChartData::new(["a", "b", "c", "d"]).with_dataset(Dataset::new("one", [0.0, 100.0, 0.0, 100.0]));
        let fixture = Fixture::new("line", json!({}), data);
        let targets = LineController.update(&fixture.ctx(), 0).unwrap();
        for target in &targets.elements {
            for key in [keys::CONTROL_POINT_PREVIOUS_Y, keys::CONTROL_POINT_NEXT_Y] {
                let y = number(target, key);
                assert!(y >= fixture.area.top && y <= fixture.area.bottom);
            }
        }
    }

    #[test]
    fn test_line_without_show_lines() {
        let data = ChartData::new(["a"]).with_dataset(Dataset::new("one", [1.0]));
        let fixture = Fixture::new("line", json!({ "showLines": false }), data);
        assert!(LineController.update(&fixture.ctx(), 0).unwrap().line.is_none());
    }

    #[test]
    fn test_radar_points_on_scale() {
        let data = ChartData::new(["a", "b", "c"]).with_dataset(Dataset::new("one", [1.0, 2.0, 3.0]));
        let fixture = Fixture::new("radar", json!({}), data);
        let targets = RadarController.update(&fixture.ctx(), 0).unwrap();
        let scale = fixture.scales.radial().unwrap();
        let (x, y) = scale.point_for_value(1, 2.0);
        assert_eq!(number(&targets.elements[1], keys::X), x);
        assert_eq!(number(&targets.elements[1], keys::Y), y);
        assert_eq!(targets.elements[1].reset[keys::X], AnimValue::from(scale.center().0));
        assert!(RadarController.closes_line());
        assert!(targets.line.is_some());
    }

    #[test]
    fn test_doughnut_arcs_cover_circle() {
        let data = ChartData::new(["a", "b", "c"]).with_dataset(Dataset::new("one", [1.0, 1.0, 2.0]));
        let fixture = Fixture::new("doughnut", json!({}), data);
        let targets = DoughnutController.update(&fixture.ctx(), 0).unwrap();
        let first = &targets.elements[0];
        let last = &targets.elements[2];
        assert!((number(first, keys::START_ANGLE) + FRAC_PI_2).abs() < 1e-12);
        assert!((number(last, keys::END_ANGLE) - (TAU - FRAC_PI_2)).abs() < 1e-9);
        assert!((number(last, keys::END_ANGLE) - number(last, keys::START_ANGLE) - std::f64::consts::PI).abs() < 1e-9);
        let outer = number(first, keys::OUTER_RADIUS);
        assert!((number(first, keys::INNER_RADIUS) - outer / 2.0).abs() < 1e-9);
        assert_eq!(first.reset[keys::END_ANGLE], AnimValue::from(-FRAC_PI_2));
    }

    #[test]
    fn test_pie_has_no_hole() {
        let data = ChartData::new(["a"]).with_dataset(Dataset::new("one", [1.0]));
        let fixture = Fixture::new("pie", json!({}), data);
        let targets = DoughnutController.update(&fixture.ctx(), 0).unwrap();
        assert_eq!(number(&targets.elements[0], keys::INNER_RADIUS), 0.0);
    }

    #[test]
    fn test_missing_dataset_is_an_error() {
        let fixture = Fixture::new("bar", json!({}), ChartData::default());
        assert!(matches!(
            BarController.update(&fixture.ctx(), 3),
            Err(ChartError::InvalidData(_))
        ));
    }
}
