//! Chart model types
//!
//! This module defines the configuration a chart is created from: the
//! chart type name, labelled datasets and the user's option overrides.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::error::ChartResult;

/// Unique identifier for a chart instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChartId(Uuid);

impl ChartId {
    /// Create a new unique chart ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ChartId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ChartId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A color for every element of a dataset, or one per value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    PerValue(Vec<String>),
}

impl ColorSpec {
    /// Color of the element at `index`. Per-value lists wrap around.
    pub fn at(&self, index: usize) -> Option<&str> {
        match self {
            ColorSpec::Single(color) => Some(color.as_str()),
            ColorSpec::PerValue(colors) if colors.is_empty() => None,
            ColorSpec::PerValue(colors) => Some(colors[index % colors.len()].as_str()),
        }
    }

    pub fn is_per_value(&self) -> bool {
        matches!(self, ColorSpec::PerValue(_))
    }
}

impl From<&str> for ColorSpec {
    fn from(color: &str) -> Self {
        ColorSpec::Single(color.to_string())
    }
}

/// One series of values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub label: String,
    /// `None` marks an absent value; it keeps its index
    pub data: Vec<Option<f64>>,
    pub hidden: bool,
    pub background_color: Option<ColorSpec>,
    pub border_color: Option<ColorSpec>,
    pub border_width: Option<f64>,
    /// Fill under a line dataset
    pub fill: Option<bool>,
    /// Line tension; 0 draws straight segments
    pub tension: Option<f64>,
    pub point_radius: Option<f64>,
    #[serde(rename = "xAxisID")]
    pub x_axis_id: Option<String>,
    #[serde(rename = "yAxisID")]
    pub y_axis_id: Option<String>,
}

impl Dataset {
    /// Create a dataset from plain values
    pub fn new(label: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            label: label.into(),
            data: values.into_iter().map(Some).collect(),
            ..Self::default()
        }
    }

    pub fn with_values(mut self, data: Vec<Option<f64>>) -> Self {
        self.data = data;
        self
    }

    pub fn with_background(mut self, color: impl Into<ColorSpec>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_border(mut self, color: impl Into<ColorSpec>, width: f64) -> Self {
        self.border_color = Some(color.into());
        self.border_width = Some(width);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Finite value at `index`
    pub fn value(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied().flatten().filter(|v| v.is_finite())
    }
}

/// Labels and datasets of a chart
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartData {
    /// Category labels, one per value index
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            datasets: Vec::new(),
        }
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    /// Get the number of value indices (max across labels and datasets)
    pub fn value_count(&self) -> usize {
        self.datasets
            .iter()
            .map(|d| d.data.len())
            .max()
            .unwrap_or(0)
            .max(self.labels.len())
    }

    /// Indices of datasets that are not hidden
    pub fn visible_indices(&self) -> Vec<usize> {
        self.datasets
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.hidden)
            .map(|(i, _)| i)
            .collect()
    }

    /// Positive and negative sums per value index over `indices`; what a
    /// stacked axis spans
    pub fn stacked_totals(&self, indices: &[usize]) -> Vec<f64> {
        let count = self.value_count();
        let mut positive = vec![0.0; count];
        let mut negative = vec![0.0; count];
        for dataset in indices.iter().filter_map(|&i| self.datasets.get(i)) {
            for (i, value) in (0..count).filter_map(|i| dataset.value(i).map(|v| (i, v))) {
                if value < 0.0 {
                    negative[i] += value;
                } else {
                    positive[i] += value;
                }
            }
        }
        positive.into_iter().chain(negative).collect()
    }

    /// Sum of the values at `index` of the datasets before `upto` (in
    /// `indices` order) with the same sign as `value`
    pub fn stack_base(&self, indices: &[usize], upto: usize, index: usize, value: f64) -> f64 {
        indices
            .iter()
            .take_while(|&&i| i != upto)
            .filter_map(|&i| self.datasets.get(i).and_then(|d| d.value(index)))
            .filter(|&v| (v < 0.0) == (value < 0.0))
            .sum()
    }
}

/// Everything a chart is created from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: String,
    #[serde(default)]
    pub data: ChartData,
    /// User overrides merged over the chart type's defaults
    #[serde(default)]
    pub options: Value,
}

impl ChartConfig {
    pub fn new(chart_type: impl Into<String>, data: ChartData) -> Self {
        Self {
            chart_type: chart_type.into(),
            data,
            options: Value::Null,
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chart_id_unique() {
        assert_ne!(ChartId::new(), ChartId::new());
        let uuid = Uuid::new_v4();
        assert_eq!(ChartId::from(uuid).as_uuid(), uuid);
    }

    #[test]
    fn test_color_spec_wraps() {
        let colors = ColorSpec::PerValue(vec!["red".into(), "blue".into()]);
        assert_eq!(colors.at(0), Some("red"));
        assert_eq!(colors.at(3), Some("blue"));
        assert_eq!(ColorSpec::PerValue(Vec::new()).at(0), None);
        assert_eq!(ColorSpec::from("green").at(7), Some("green"));
    }

    #[test]
    fn test_config_from_json() {
        let config = ChartConfig::from_json(
            r##"{
                "type": "bar",
                "data": {
                    "labels": ["a", "b", "c"],
                    "datasets": [{
                        "label": "first",
                        "data": [1, null, 3],
                        "backgroundColor": ["#f00", "#0f0"],
                        "yAxisID": "y-axis-0"
                    }]
                },
                "options": { "hover": { "mode": "dataset" } }
            }"##,
        )
        .unwrap();
        assert_eq!(config.chart_type, "bar");
        let dataset = &config.data.datasets[0];
        assert_eq!(dataset.data, vec![Some(1.0), None, Some(3.0)]);
        assert!(dataset.background_color.as_ref().unwrap().is_per_value());
        assert_eq!(dataset.y_axis_id.as_deref(), Some("y-axis-0"));
        assert_eq!(config.options["hover"]["mode"], json!("dataset"));
    }

    #[test]
    fn test_value_count_includes_labels() {
        let data = ChartData::new(["a", "b", "c", "d"]).with_dataset(Dataset::new("x", [1.0, 2.0]));
        assert_eq!(data.value_count(), 4);
        assert_eq!(data.datasets[0].value(3), None);
    }

    #[test]
    fn test_stacked_totals_split_by_sign() {
        let data = ChartData::new(["a", "b"])
            .with_dataset(Dataset::new("one", [10.0, -5.0]))
            .with_dataset(Dataset::new("two", [5.0, -5.0]))
            .with_dataset(Dataset::new("three", [100.0, 100.0]).hidden());
        let totals = data.stacked_totals(&data.visible_indices());
        assert_eq!(totals, vec![15.0, 0.0, 0.0, -10.0]);
    }

    #[test]
    fn test_stack_base_same_sign_only() {
        let data = ChartData::new(["a"])
            .with_dataset(Dataset::new("one", [10.0]))
            .with_dataset(Dataset::new("two", [-4.0]))
            .with_dataset(Dataset::new("three", [5.0]));
        let visible = data.visible_indices();
        assert_eq!(data.stack_base(&visible, 0, 0, 10.0), 0.0);
        assert_eq!(data.stack_base(&visible, 2, 0, 5.0), 10.0);
        assert_eq!(data.stack_base(&visible, 1, 0, -4.0), 0.0);
    }

    #[test]
    fn test_non_finite_values_are_absent() {
        let dataset = Dataset::new("x", [f64::NAN, 1.0]);
        assert_eq!(dataset.value(0), None);
        assert_eq!(dataset.value(1), Some(1.0));
    }
}
