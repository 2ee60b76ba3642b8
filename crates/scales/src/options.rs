//! Scale options
//!
//! Typed views over the `scales` section of a resolved chart configuration.
//! Every field has a default so partial configuration deserializes.

use crate::range::{RangeOverride, TickBounds};
use canvas::{FontSpec, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_FONT_STYLE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Default color for labels
pub const DEFAULT_FONT_COLOR: &str = "#666";

/// Default color for grid lines
pub const DEFAULT_GRID_COLOR: &str = "rgba(0, 0, 0, 0.1)";

/// Where a scale sits relative to the chart area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
    ChartArea,
}

impl Position {
    /// True for scales laid out along the x axis
    pub fn is_horizontal(self) -> bool {
        matches!(self, Position::Top | Position::Bottom)
    }
}

/// User formatter for a label, given its default text and its index in
/// drawing order
#[derive(Clone)]
pub struct LabelCallback(Rc<dyn Fn(&str, usize) -> String>);

impl LabelCallback {
    pub fn new(callback: impl Fn(&str, usize) -> String + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub fn call(&self, label: &str, index: usize) -> String {
        (self.0)(label, index)
    }

    /// Rewrite every label in place
    pub fn apply(&self, labels: &mut [String]) {
        for (index, label) in labels.iter_mut().enumerate() {
            *label = self.call(label, index);
        }
    }
}

impl fmt::Debug for LabelCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelCallback(..)")
    }
}

impl PartialEq for LabelCallback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Tick label options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TickOptions {
    pub show: bool,
    pub font_size: f64,
    pub font_style: String,
    pub font_family: String,
    pub font_color: String,
    pub max_rotation: u32,
    pub begin_at_zero: bool,
    pub integers_only: bool,
    /// Explicit range used instead of fitting
    #[serde(rename = "override")]
    pub range_override: Option<RangeOverride>,
    /// Exact first tick
    pub min: Option<f64>,
    /// Exact last tick
    pub max: Option<f64>,
    pub suggested_min: Option<f64>,
    pub suggested_max: Option<f64>,
    pub step_size: Option<f64>,
    pub max_ticks_limit: Option<usize>,
    /// Draw the range from max to min
    pub reverse: bool,
    #[serde(skip)]
    pub callback: Option<LabelCallback>,
    pub show_label_backdrop: bool,
    pub backdrop_color: String,
    pub backdrop_padding_x: f64,
    pub backdrop_padding_y: f64,
}

impl TickOptions {
    /// Font used for tick labels
    pub fn font(&self) -> FontSpec {
        FontSpec::new(self.font_style.clone(), self.font_size, self.font_family.clone())
    }

    /// Format every tick label through `callback`
    pub fn with_callback(mut self, callback: impl Fn(&str, usize) -> String + 'static) -> Self {
        self.callback = Some(LabelCallback::new(callback));
        self
    }

    /// Bounds that drive tick generation on numeric axes
    pub fn bounds(&self) -> TickBounds {
        TickBounds {
            min: self.min,
            max: self.max,
            suggested_min: self.suggested_min,
            suggested_max: self.suggested_max,
            step_size: self.step_size,
            max_ticks_limit: self.max_ticks_limit,
        }
    }
}

impl Default for TickOptions {
    fn default() -> Self {
        Self {
            show: true,
            font_size: DEFAULT_FONT_SIZE,
            font_style: DEFAULT_FONT_STYLE.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_color: DEFAULT_FONT_COLOR.to_string(),
            max_rotation: 90,
            begin_at_zero: false,
            integers_only: true,
            range_override: None,
            min: None,
            max: None,
            suggested_min: None,
            suggested_max: None,
            step_size: None,
            max_ticks_limit: None,
            reverse: false,
            callback: None,
            show_label_backdrop: true,
            backdrop_color: "rgba(255, 255, 255, 0.75)".to_string(),
            backdrop_padding_x: 2.0,
            backdrop_padding_y: 2.0,
        }
    }
}

/// Grid line options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridLineOptions {
    pub show: bool,
    pub color: String,
    pub line_width: f64,
    pub draw_on_chart_area: bool,
    pub draw_ticks: bool,
    pub zero_line_width: f64,
    pub zero_line_color: String,
    /// Center categories between grid lines
    pub offset_grid_lines: bool,
}

impl Default for GridLineOptions {
    fn default() -> Self {
        Self {
            show: true,
            color: DEFAULT_GRID_COLOR.to_string(),
            line_width: 1.0,
            draw_on_chart_area: true,
            draw_ticks: true,
            zero_line_width: 1.0,
            zero_line_color: "rgba(0, 0, 0, 0.25)".to_string(),
            offset_grid_lines: false,
        }
    }
}

/// Options for a category axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryScaleOptions {
    pub id: String,
    pub display: bool,
    pub position: Position,
    pub stacked: bool,
    /// Space between category groups, on each side
    pub category_spacing: f64,
    /// Space between bars inside a group
    pub spacing: f64,
    pub grid_lines: GridLineOptions,
    pub ticks: TickOptions,
}

impl Default for CategoryScaleOptions {
    fn default() -> Self {
        Self {
            id: "x-axis-0".to_string(),
            display: true,
            position: Position::Bottom,
            stacked: false,
            category_spacing: 10.0,
            spacing: 1.0,
            grid_lines: GridLineOptions::default(),
            ticks: TickOptions {
                max_rotation: 50,
                ..TickOptions::default()
            },
        }
    }
}

/// Options for a linear axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinearScaleOptions {
    pub id: String,
    pub display: bool,
    pub position: Position,
    pub stacked: bool,
    pub grid_lines: GridLineOptions,
    pub ticks: TickOptions,
}

impl Default for LinearScaleOptions {
    fn default() -> Self {
        Self {
            id: "y-axis-0".to_string(),
            display: true,
            position: Position::Left,
            stacked: false,
            grid_lines: GridLineOptions::default(),
            ticks: TickOptions::default(),
        }
    }
}

/// Lines from the center to each point of a radial scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AngleLineOptions {
    pub show: bool,
    pub color: String,
    pub line_width: f64,
}

impl Default for AngleLineOptions {
    fn default() -> Self {
        Self {
            show: true,
            color: DEFAULT_GRID_COLOR.to_string(),
            line_width: 1.0,
        }
    }
}

/// Labels around the outside of a radial scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointLabelOptions {
    pub font_size: f64,
    pub font_style: String,
    pub font_family: String,
    pub font_color: String,
    #[serde(skip)]
    pub callback: Option<LabelCallback>,
}

impl PointLabelOptions {
    /// Font used for point labels
    pub fn font(&self) -> FontSpec {
        FontSpec::new(self.font_style.clone(), self.font_size, self.font_family.clone())
    }

    /// Format every point label through `callback`
    pub fn with_callback(mut self, callback: impl Fn(&str, usize) -> String + 'static) -> Self {
        self.callback = Some(LabelCallback::new(callback));
        self
    }
}

impl Default for PointLabelOptions {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            font_style: DEFAULT_FONT_STYLE.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_color: DEFAULT_FONT_COLOR.to_string(),
            callback: None,
        }
    }
}

/// Options for a radial scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadialScaleOptions {
    pub id: String,
    pub display: bool,
    /// Circular grid without point labels
    pub line_arc: bool,
    pub angle_lines: AngleLineOptions,
    pub grid_lines: GridLineOptions,
    pub ticks: TickOptions,
    pub point_labels: PointLabelOptions,
}

impl Default for RadialScaleOptions {
    fn default() -> Self {
        Self {
            id: "scale".to_string(),
            display: true,
            line_arc: false,
            angle_lines: AngleLineOptions::default(),
            grid_lines: GridLineOptions::default(),
            ticks: TickOptions::default(),
            point_labels: PointLabelOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_category_options() {
        let json = r#"{"stacked": true, "ticks": {"fontSize": 9}}"#;
        let options: CategoryScaleOptions = serde_json::from_str(json).unwrap();
        assert!(options.stacked);
        assert_eq!(options.ticks.font_size, 9.0);
        assert!(options.ticks.show);
        assert_eq!(options.ticks.max_rotation, 90);
        assert_eq!(options.category_spacing, 10.0);
    }

    #[test]
    fn test_override_field_name() {
        let json = r#"{"ticks": {"override": {"steps": 5, "stepWidth": 10, "start": 0}}}"#;
        let options: LinearScaleOptions = serde_json::from_str(json).unwrap();
        let range_override = options.ticks.range_override.unwrap();
        assert_eq!(range_override.steps, 5);
        assert_eq!(range_override.step_width, 10.0);
    }

    #[test]
    fn test_tick_bounds_fields() {
        let json = r#"{"ticks": {"min": -5, "suggestedMax": 20, "stepSize": 2.5, "maxTicksLimit": 6, "reverse": true}}"#;
        let options: RadialScaleOptions = serde_json::from_str(json).unwrap();
        let bounds = options.ticks.bounds();
        assert_eq!(bounds.min, Some(-5.0));
        assert_eq!(bounds.max, None);
        assert_eq!(bounds.suggested_max, Some(20.0));
        assert_eq!(bounds.step_size, Some(2.5));
        assert_eq!(bounds.max_ticks_limit, Some(6));
        assert!(bounds.is_set());
        assert!(options.ticks.reverse);
        assert_eq!(options.id, "scale");
        assert!(!TickOptions::default().bounds().is_set());
    }

    #[test]
    fn test_callbacks_compare_by_identity() {
        let ticks = TickOptions::default().with_callback(|label, index| format!("{}:{}", index, label));
        assert_eq!(ticks.clone(), ticks);
        assert_ne!(ticks, TickOptions::default().with_callback(|label, _| label.to_string()));

        let mut labels = vec!["a".to_string(), "b".to_string()];
        if let Some(callback) = &ticks.callback {
            callback.apply(&mut labels);
        }
        assert_eq!(labels, vec!["0:a".to_string(), "1:b".to_string()]);
    }

    #[test]
    fn test_position_names() {
        let position: Position = serde_json::from_str("\"chartArea\"").unwrap();
        assert_eq!(position, Position::ChartArea);
        assert!(Position::Top.is_horizontal());
        assert!(!Position::Left.is_horizontal());
    }
}
