//! Animation configuration
//!
//! The `animation` section of a chart's options lists named groups of
//! properties, each with optional duration, easing, value type and from/to
//! overrides. [`PropertyRegistry`] resolves those groups once into a lookup
//! from property name to its animation settings.

use crate::easing::Easing;
use crate::error::{AnimationError, AnimationResult};
use crate::value::AnimValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default animation duration in milliseconds
pub const DEFAULT_DURATION_MS: f64 = 1000.0;

/// Keys of the animation section that are not property groups
const RESERVED_KEYS: [&str; 11] = [
    "duration",
    "easing",
    "delay",
    "loop",
    "onProgress",
    "onComplete",
    "debug",
    "active",
    "resize",
    "show",
    "hide",
];

/// How a property's values are interpolated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    Number,
    Color,
    Boolean,
}

impl PropertyKind {
    /// Kind implied by a value
    pub fn of(value: &AnimValue) -> Self {
        match value {
            AnimValue::Number(_) => PropertyKind::Number,
            AnimValue::Color(_) => PropertyKind::Color,
            AnimValue::Bool(_) => PropertyKind::Boolean,
        }
    }
}

/// Resolved animation settings for one property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAnimation {
    /// Interpolation; inferred from the target value when absent
    pub kind: Option<PropertyKind>,
    pub duration_ms: f64,
    pub easing: Easing,
    /// Start value used instead of the current value
    pub from: Option<AnimValue>,
    /// End value used instead of the requested value
    pub to: Option<AnimValue>,
}

impl PropertyAnimation {
    pub fn new(duration_ms: f64, easing: Easing) -> Self {
        Self {
            kind: None,
            duration_ms,
            easing,
            from: None,
            to: None,
        }
    }

    pub fn with_kind(mut self, kind: PropertyKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_from(mut self, from: impl Into<AnimValue>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_to(mut self, to: impl Into<AnimValue>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Animations with no duration are applied immediately
    pub fn is_animated(&self) -> bool {
        self.duration_ms > 0.0
    }
}

/// One named group in the animation section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationGroup {
    /// Properties in the group; empty means the group key itself
    pub properties: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Option<PropertyKind>,
    pub duration: Option<f64>,
    pub easing: Option<Easing>,
    pub from: Option<AnimValue>,
    pub to: Option<AnimValue>,
}

impl AnimationGroup {
    pub fn new(properties: &[&str]) -> Self {
        Self {
            properties: properties.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: PropertyKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Why an update is happening; selects a mode section of the animation
/// options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateMode {
    #[default]
    Default,
    Active,
    Resize,
    Show,
    Hide,
}

impl UpdateMode {
    /// Name of the mode's section in the animation options
    pub fn key(self) -> Option<&'static str> {
        match self {
            UpdateMode::Default => None,
            UpdateMode::Active => Some("active"),
            UpdateMode::Resize => Some("resize"),
            UpdateMode::Show => Some("show"),
            UpdateMode::Hide => Some("hide"),
        }
    }
}

/// The animation section of a chart's options
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSettings {
    pub duration_ms: f64,
    pub easing: Easing,
    pub groups: BTreeMap<String, AnimationGroup>,
}

impl AnimationSettings {
    /// Settings with no property groups
    pub fn empty() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::default(),
            groups: BTreeMap::new(),
        }
    }

    /// Numbers and colors groups with the default duration and easing
    pub fn standard() -> Self {
        Self::empty()
            .with_group(
                "numbers",
                AnimationGroup::new(&["x", "y", "borderWidth", "radius", "tension"]).with_kind(PropertyKind::Number),
            )
            .with_group(
                "colors",
                AnimationGroup::new(&["borderColor", "backgroundColor"]).with_kind(PropertyKind::Color),
            )
    }

    pub fn with_group(mut self, name: impl Into<String>, group: AnimationGroup) -> Self {
        self.groups.insert(name.into(), group);
        self
    }

    /// Read an already mode-merged animation section.
    ///
    /// `false` disables animation and yields `None`.
    pub fn from_value(value: &Value) -> AnimationResult<Option<Self>> {
        let map = match value {
            Value::Bool(false) => return Ok(None),
            Value::Null | Value::Bool(true) => return Ok(Some(Self::empty())),
            Value::Object(map) => map,
            other => {
                return Err(AnimationError::InvalidConfig(format!(
                    "animation must be an object or false, got {}",
                    other
                )))
            }
        };

        let mut settings = Self::empty();
        if let Some(duration) = map.get("duration") {
            settings.duration_ms = duration
                .as_f64()
                .filter(|d| d.is_finite() && *d >= 0.0)
                .ok_or_else(|| AnimationError::InvalidConfig(format!("invalid duration {}", duration)))?;
        }
        if let Some(easing) = map.get("easing") {
            let name = easing
                .as_str()
                .ok_or_else(|| AnimationError::InvalidConfig(format!("invalid easing {}", easing)))?;
            settings.easing = name.parse()?;
        }
        for (key, group) in map {
            if RESERVED_KEYS.contains(&key.as_str()) || !group.is_object() {
                continue;
            }
            settings.groups.insert(key.clone(), AnimationGroup::deserialize(group)?);
        }
        Ok(Some(settings))
    }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self::standard()
    }
}

/// Property name to resolved animation settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRegistry {
    properties: BTreeMap<String, PropertyAnimation>,
}

impl PropertyRegistry {
    /// Registry that animates nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every group once.
    ///
    /// A group named after a property takes precedence over other groups
    /// listing that property.
    pub fn from_settings(settings: &AnimationSettings) -> Self {
        let mut registry = Self::new();
        for (key, group) in &settings.groups {
            let resolved = PropertyAnimation {
                kind: group.kind,
                duration_ms: group.duration.unwrap_or(settings.duration_ms),
                easing: group.easing.unwrap_or(settings.easing),
                from: group.from.clone(),
                to: group.to.clone(),
            };
            let properties = if group.properties.is_empty() {
                std::slice::from_ref(key)
            } else {
                group.properties.as_slice()
            };
            for property in properties {
                if property == key || !registry.properties.contains_key(property) {
                    registry.properties.insert(property.clone(), resolved.clone());
                }
            }
        }
        registry
    }

    pub fn insert(&mut self, property: impl Into<String>, animation: PropertyAnimation) {
        self.properties.insert(property.into(), animation);
    }

    pub fn get(&self, property: &str) -> Option<&PropertyAnimation> {
        self.properties.get(property)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}
