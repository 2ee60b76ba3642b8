//! Built-in defaults
//!
//! Global defaults apply to every chart. Each chart type layers its own
//! defaults on top, and each axis layers the defaults of its scale type.

use scales::{CategoryScaleOptions, LinearScaleOptions, RadialScaleOptions};
use serde_json::{json, Value};

/// Fallback color for elements without one
pub const DEFAULT_COLOR: &str = "rgba(0,0,0,0.1)";

/// Element properties animated as numbers
pub const NUMBER_PROPERTIES: [&str; 16] = [
    "x",
    "y",
    "base",
    "width",
    "radius",
    "borderWidth",
    "tension",
    "startAngle",
    "endAngle",
    "innerRadius",
    "outerRadius",
    "hitRadius",
    "controlPointPreviousX",
    "controlPointPreviousY",
    "controlPointNextX",
    "controlPointNextY",
];

/// Element properties animated as colors
pub const COLOR_PROPERTIES: [&str; 2] = ["backgroundColor", "borderColor"];

/// Defaults shared by every chart type
pub fn global_defaults() -> Value {
    json!({
        "responsive": false,
        "maintainAspectRatio": true,
        "defaultColor": DEFAULT_COLOR,
        "defaultFontColor": scales::DEFAULT_FONT_COLOR,
        "defaultFontFamily": canvas::DEFAULT_FONT_FAMILY,
        "defaultFontSize": canvas::DEFAULT_FONT_SIZE,
        "hover": {
            "mode": "single",
            "animationDuration": 400
        },
        "animation": {
            "duration": 1000,
            "easing": "easeOutQuart",
            "numbers": { "type": "number", "properties": NUMBER_PROPERTIES },
            "colors": { "type": "color", "properties": COLOR_PROPERTIES },
            "active": { "duration": 400 },
            "resize": { "duration": 0 },
            "show": {
                "colors": { "type": "color", "properties": COLOR_PROPERTIES, "from": "transparent" }
            },
            "hide": {
                "colors": { "type": "color", "properties": COLOR_PROPERTIES, "to": "transparent" }
            }
        },
        "elements": {
            "point": {
                "radius": 3,
                "backgroundColor": DEFAULT_COLOR,
                "borderWidth": 1,
                "borderColor": DEFAULT_COLOR,
                "hitRadius": 1,
                "hoverRadius": 4,
                "hoverBorderWidth": 1
            },
            "line": {
                "tension": 0.4,
                "backgroundColor": DEFAULT_COLOR,
                "borderWidth": 3,
                "borderColor": DEFAULT_COLOR,
                "fill": true
            },
            "rectangle": {
                "backgroundColor": DEFAULT_COLOR,
                "borderWidth": 0,
                "borderColor": DEFAULT_COLOR
            },
            "arc": {
                "backgroundColor": DEFAULT_COLOR,
                "borderColor": "#fff",
                "borderWidth": 2
            }
        }
    })
}

pub fn bar_defaults() -> Value {
    json!({
        "hover": { "mode": "label" },
        "scales": {
            "xAxes": [{
                "type": "category",
                "position": "bottom",
                "gridLines": { "offsetGridLines": true }
            }],
            "yAxes": [{
                "type": "linear",
                "position": "left"
            }]
        }
    })
}

pub fn line_defaults() -> Value {
    json!({
        "showLines": true,
        "scales": {
            "xAxes": [{ "type": "category", "position": "bottom" }],
            "yAxes": [{ "type": "linear", "position": "left" }]
        }
    })
}

pub fn radar_defaults() -> Value {
    json!({
        "scale": { "type": "radialLinear" },
        "elements": {
            "line": { "tension": 0 }
        }
    })
}

pub fn doughnut_defaults() -> Value {
    json!({
        "cutoutPercentage": 50,
        "animation": {
            "animateRotate": true,
            "animateScale": false
        }
    })
}

/// Pie charts are doughnuts without a hole
pub fn pie_defaults() -> Value {
    json!({ "cutoutPercentage": 0 })
}

/// Defaults of every built-in scale type, keyed by type name
pub fn scale_defaults() -> Vec<(&'static str, Value)> {
    vec![
        ("category", serde_json::to_value(CategoryScaleOptions::default()).unwrap_or_default()),
        ("linear", serde_json::to_value(LinearScaleOptions::default()).unwrap_or_default()),
        ("radialLinear", serde_json::to_value(RadialScaleOptions::default()).unwrap_or_default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_groups_present() {
        let global = global_defaults();
        assert_eq!(global["animation"]["duration"], 1000);
        assert_eq!(global["animation"]["numbers"]["properties"][0], "x");
        assert_eq!(global["animation"]["hide"]["colors"]["to"], "transparent");
    }

    #[test]
    fn test_scale_defaults_serialize() {
        let defaults = scale_defaults();
        assert_eq!(defaults.len(), 3);
        let (name, category) = &defaults[0];
        assert_eq!(*name, "category");
        assert_eq!(category["categorySpacing"], 10.0);
        assert_eq!(category["ticks"]["maxRotation"], 50);
        assert!(category["ticks"]["override"].is_null());
    }
}
