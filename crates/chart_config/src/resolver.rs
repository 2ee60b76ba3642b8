//! Options resolution by chart type name

use crate::defaults::{
    bar_defaults, doughnut_defaults, global_defaults, line_defaults, pie_defaults, radar_defaults, scale_defaults,
};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{config_merge, merge_into};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Axis lists that receive per-scale-type defaults
const AXIS_LISTS: [&str; 2] = ["xAxes", "yAxes"];

/// Resolves a chart type's fully merged options
pub trait OptionsResolver {
    fn resolve(&self, chart_type: &str, user_options: &Value) -> ConfigResult<Value>;
}

/// Layered defaults: global, then chart type, then per-axis scale type
#[derive(Debug, Clone)]
pub struct DefaultsRegistry {
    global: Value,
    types: BTreeMap<String, Value>,
    scales: BTreeMap<String, Value>,
}

impl Default for DefaultsRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl DefaultsRegistry {
    /// Registry with empty global defaults and no chart types
    pub fn new() -> Self {
        Self {
            global: json!({}),
            types: BTreeMap::new(),
            scales: BTreeMap::new(),
        }
    }

    /// Registry with the built-in chart and scale types
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.global = global_defaults();
        registry.register_type("bar", bar_defaults());
        registry.register_type("line", line_defaults());
        registry.register_type("radar", radar_defaults());
        registry.register_type("doughnut", doughnut_defaults());
        for (name, defaults) in scale_defaults() {
            registry.register_scale(name, defaults);
        }
        registry.register_type("pie", config_merge(&doughnut_defaults(), [&pie_defaults()]));
        registry
    }

    pub fn global(&self) -> &Value {
        &self.global
    }

    /// Merge `overrides` into the global defaults
    pub fn update_global(&mut self, overrides: &Value) {
        merge_into(&mut self.global, overrides);
    }

    /// Register or replace a chart type
    pub fn register_type(&mut self, name: impl Into<String>, defaults: Value) {
        let name = name.into();
        debug!(chart_type = %name, "registering chart type defaults");
        self.types.insert(name, defaults);
    }

    /// Register a chart type whose defaults start from another type's
    pub fn extend_type(&mut self, name: impl Into<String>, base: &str, defaults: Value) -> ConfigResult<()> {
        let base_defaults = self
            .types
            .get(base)
            .ok_or_else(|| ConfigError::UnknownChartType(base.to_string()))?;
        let merged = config_merge(base_defaults, [&defaults]);
        self.register_type(name, merged);
        Ok(())
    }

    pub fn register_scale(&mut self, scale_type: impl Into<String>, defaults: Value) {
        self.scales.insert(scale_type.into(), defaults);
    }

    pub fn type_defaults(&self, name: &str) -> Option<&Value> {
        self.types.get(name)
    }

    pub fn scale_defaults(&self, scale_type: &str) -> Option<&Value> {
        self.scales.get(scale_type)
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn chart_types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    fn apply_scale_defaults(&self, resolved: &mut Value) {
        if let Some(scales) = resolved.get_mut("scales") {
            for list in AXIS_LISTS {
                if let Some(Value::Array(axes)) = scales.get_mut(list) {
                    for axis in axes.iter_mut() {
                        self.apply_axis_defaults(axis);
                    }
                }
            }
        }
        if let Some(scale) = resolved.get_mut("scale") {
            self.apply_axis_defaults(scale);
        }
    }

    fn apply_axis_defaults(&self, axis: &mut Value) {
        let defaults = axis
            .get("type")
            .and_then(Value::as_str)
            .and_then(|scale_type| self.scales.get(scale_type));
        if let Some(defaults) = defaults {
            *axis = config_merge(defaults, [&*axis]);
        }
    }
}

impl OptionsResolver for DefaultsRegistry {
    fn resolve(&self, chart_type: &str, user_options: &Value) -> ConfigResult<Value> {
        let type_defaults = self
            .types
            .get(chart_type)
            .ok_or_else(|| ConfigError::UnknownChartType(chart_type.to_string()))?;
        let mut resolved = config_merge(&self.global, [type_defaults, user_options]);
        self.apply_scale_defaults(&mut resolved);
        Ok(resolved)
    }
}
