//! Animated values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A property value that can be animated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimValue {
    Number(f64),
    Bool(bool),
    Color(String),
}

/// Property name to value
pub type PropertyMap = BTreeMap<String, AnimValue>;

impl AnimValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnimValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&str> {
        match self {
            AnimValue::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnimValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert a JSON scalar; objects, arrays and null have no value
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(AnimValue::Number),
            serde_json::Value::Bool(b) => Some(AnimValue::Bool(*b)),
            serde_json::Value::String(s) => Some(AnimValue::Color(s.clone())),
            _ => None,
        }
    }
}

impl From<f64> for AnimValue {
    fn from(value: f64) -> Self {
        AnimValue::Number(value)
    }
}

impl From<bool> for AnimValue {
    fn from(value: bool) -> Self {
        AnimValue::Bool(value)
    }
}

impl From<&str> for AnimValue {
    fn from(value: &str) -> Self {
        AnimValue::Color(value.to_string())
    }
}

impl From<String> for AnimValue {
    fn from(value: String) -> Self {
        AnimValue::Color(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_serde() {
        let map: PropertyMap = serde_json::from_str(r#"{"x": 5, "visible": true, "borderColor": "red"}"#).unwrap();
        assert_eq!(map["x"], AnimValue::Number(5.0));
        assert_eq!(map["visible"], AnimValue::Bool(true));
        assert_eq!(map["borderColor"].as_color(), Some("red"));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(AnimValue::from_json(&serde_json::json!(2.5)), Some(AnimValue::Number(2.5)));
        assert_eq!(AnimValue::from_json(&serde_json::json!(null)), None);
        assert_eq!(AnimValue::from_json(&serde_json::json!([1])), None);
    }
}
