//! Typed views over resolved options
//!
//! Resolution works on `serde_json::Value` trees; chart code reads the
//! result through these structs. Every field has a default so a partially
//! resolved tree still deserializes.

use crate::defaults::DEFAULT_COLOR;
use crate::error::ConfigResult;
use crate::merge::config_merge;
use animation::{AnimationSettings, UpdateMode};
use scales::{CategoryScaleOptions, LinearScaleOptions, Position, RadialScaleOptions};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which elements a hover activates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HoverMode {
    /// The element under the pointer
    #[default]
    Single,
    /// Every element in the pointer's column
    Label,
    /// Every element of the hovered dataset
    Dataset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HoverOptions {
    pub mode: HoverMode,
    pub animation_duration: f64,
}

impl Default for HoverOptions {
    fn default() -> Self {
        Self {
            mode: HoverMode::Single,
            animation_duration: 400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointOptions {
    pub radius: f64,
    pub background_color: String,
    pub border_width: f64,
    pub border_color: String,
    pub hit_radius: f64,
    pub hover_radius: f64,
    pub hover_border_width: f64,
}

impl Default for PointOptions {
    fn default() -> Self {
        Self {
            radius: 3.0,
            background_color: DEFAULT_COLOR.to_string(),
            border_width: 1.0,
            border_color: DEFAULT_COLOR.to_string(),
            hit_radius: 1.0,
            hover_radius: 4.0,
            hover_border_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineOptions {
    pub tension: f64,
    pub background_color: String,
    pub border_width: f64,
    pub border_color: String,
    pub fill: bool,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            tension: 0.4,
            background_color: DEFAULT_COLOR.to_string(),
            border_width: 3.0,
            border_color: DEFAULT_COLOR.to_string(),
            fill: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RectangleOptions {
    pub background_color: String,
    pub border_width: f64,
    pub border_color: String,
}

impl Default for RectangleOptions {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_COLOR.to_string(),
            border_width: 0.0,
            border_color: DEFAULT_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArcOptions {
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
}

impl Default for ArcOptions {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_COLOR.to_string(),
            border_color: "#fff".to_string(),
            border_width: 2.0,
        }
    }
}

/// Default style of each element kind
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementOptions {
    pub point: PointOptions,
    pub line: LineOptions,
    pub rectangle: RectangleOptions,
    pub arc: ArcOptions,
}

/// One cartesian axis, selected by its `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AxisOptions {
    #[serde(rename = "category")]
    Category(CategoryScaleOptions),
    #[serde(rename = "linear")]
    Linear(LinearScaleOptions),
}

impl AxisOptions {
    pub fn id(&self) -> &str {
        match self {
            AxisOptions::Category(options) => &options.id,
            AxisOptions::Linear(options) => &options.id,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            AxisOptions::Category(options) => options.position,
            AxisOptions::Linear(options) => options.position,
        }
    }

    pub fn is_stacked(&self) -> bool {
        match self {
            AxisOptions::Category(options) => options.stacked,
            AxisOptions::Linear(options) => options.stacked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScalesOptions {
    pub x_axes: Vec<AxisOptions>,
    pub y_axes: Vec<AxisOptions>,
}

/// The chart-level view of a resolved options tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub default_color: String,
    pub default_font_color: String,
    pub default_font_family: String,
    pub default_font_size: f64,
    pub hover: HoverOptions,
    pub elements: ElementOptions,
    pub scales: ScalesOptions,
    /// The single radial scale of radar charts
    pub scale: Option<RadialScaleOptions>,
    pub show_lines: bool,
    /// Hole in the middle of doughnut charts, percent of the radius
    pub cutout_percentage: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: false,
            maintain_aspect_ratio: true,
            default_color: DEFAULT_COLOR.to_string(),
            default_font_color: scales::DEFAULT_FONT_COLOR.to_string(),
            default_font_family: canvas::DEFAULT_FONT_FAMILY.to_string(),
            default_font_size: canvas::DEFAULT_FONT_SIZE,
            hover: HoverOptions::default(),
            elements: ElementOptions::default(),
            scales: ScalesOptions::default(),
            scale: None,
            show_lines: true,
            cutout_percentage: 0.0,
        }
    }
}

impl ChartOptions {
    pub fn from_resolved(resolved: &Value) -> ConfigResult<Self> {
        Ok(serde_json::from_value(resolved.clone())?)
    }
}

/// Deserialize the part of `resolved` at a JSON pointer; missing parts
/// yield the default
pub fn section<T: DeserializeOwned + Default>(resolved: &Value, pointer: &str) -> ConfigResult<T> {
    match resolved.pointer(pointer) {
        Some(value) if !value.is_null() => Ok(serde_json::from_value(value.clone())?),
        _ => Ok(T::default()),
    }
}

/// Animation settings for an update mode: the mode's section is merged over
/// the base animation options. `None` means updates apply immediately.
pub fn animation_settings(resolved: &Value, mode: UpdateMode) -> ConfigResult<Option<AnimationSettings>> {
    let animation = resolved.get("animation").cloned().unwrap_or(Value::Null);
    let merged = match (mode.key().and_then(|key| animation.get(key)), animation.is_object()) {
        (Some(Value::Bool(false)), true) => return Ok(None),
        (Some(section), true) if section.is_object() => config_merge(&animation, [section]),
        _ => animation.clone(),
    };
    Ok(AnimationSettings::from_value(&merged)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{DefaultsRegistry, OptionsResolver};
    use animation::{Easing, PropertyRegistry};
    use serde_json::json;

    fn resolved(chart_type: &str, user: Value) -> Value {
        DefaultsRegistry::standard().resolve(chart_type, &user).unwrap()
    }

    #[test]
    fn test_chart_options_from_bar() {
        let options = ChartOptions::from_resolved(&resolved("bar", json!({}))).unwrap();
        assert_eq!(options.hover.mode, HoverMode::Label);
        assert_eq!(options.scales.x_axes.len(), 1);
        assert!(matches!(options.scales.x_axes[0], AxisOptions::Category(_)));
        assert_eq!(options.scales.y_axes[0].id(), "y-axis-0");
        assert_eq!(options.scales.y_axes[0].position(), Position::Left);
        assert!(options.scale.is_none());
    }

    #[test]
    fn test_chart_options_from_radar() {
        let options = ChartOptions::from_resolved(&resolved("radar", json!({}))).unwrap();
        assert!(options.scale.is_some());
        assert_eq!(options.elements.line.tension, 0.0);
    }

    #[test]
    fn test_unknown_axis_type_is_rejected() {
        let tree = resolved("bar", json!({"scales": {"xAxes": [{"type": "logarithmic"}]}}));
        assert!(ChartOptions::from_resolved(&tree).is_err());
    }

    #[test]
    fn test_section() {
        let tree = resolved("line", json!({"elements": {"point": {"radius": 9}}}));
        let point: PointOptions = section(&tree, "/elements/point").unwrap();
        assert_eq!(point.radius, 9.0);
        assert_eq!(point.hover_radius, 4.0);
        let missing: ArcOptions = section(&tree, "/nothing/here").unwrap();
        assert_eq!(missing, ArcOptions::default());
    }

    #[test]
    fn test_animation_modes() {
        let tree = resolved("line", json!({}));
        let base = animation_settings(&tree, UpdateMode::Default).unwrap().unwrap();
        assert_eq!(base.duration_ms, 1000.0);
        assert_eq!(base.easing, Easing::EaseOutQuart);
        let registry = PropertyRegistry::from_settings(&base);
        assert!(registry.get("controlPointNextX").is_some());
        assert!(registry.get("backgroundColor").is_some());

        let active = animation_settings(&tree, UpdateMode::Active).unwrap().unwrap();
        assert_eq!(active.duration_ms, 400.0);

        let resize = animation_settings(&tree, UpdateMode::Resize).unwrap().unwrap();
        let registry = PropertyRegistry::from_settings(&resize);
        assert!(registry.get("x").is_some_and(|cfg| !cfg.is_animated()));

        let show = animation_settings(&tree, UpdateMode::Show).unwrap().unwrap();
        let registry = PropertyRegistry::from_settings(&show);
        assert_eq!(
            registry.get("borderColor").and_then(|cfg| cfg.from.clone()),
            Some("transparent".into())
        );
    }

    #[test]
    fn test_animation_disabled() {
        let tree = resolved("line", json!({"animation": false}));
        assert!(animation_settings(&tree, UpdateMode::Default).unwrap().is_none());
        assert!(animation_settings(&tree, UpdateMode::Active).unwrap().is_none());

        let tree = resolved("line", json!({"animation": {"active": false}}));
        assert!(animation_settings(&tree, UpdateMode::Active).unwrap().is_none());
        assert!(animation_settings(&tree, UpdateMode::Default).unwrap().is_some());
    }
}
