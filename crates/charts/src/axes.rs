//! The scales of one chart
//!
//! Scales are rebuilt from resolved options on every update and fed the
//! values of the visible datasets bound to them.

use chart_config::{AxisOptions, ChartOptions};
use scales::{CategoryScale, LinearScale, RadialScale, Scale, ScaleGeometry};

use crate::model::ChartData;

/// Any scale a chart can own
#[derive(Debug, Clone)]
pub enum ChartScale {
    Category(CategoryScale),
    Linear(LinearScale),
    Radial(RadialScale),
}

impl ChartScale {
    fn from_axis(axis: &AxisOptions, labels: &[String]) -> Self {
        match axis {
            AxisOptions::Category(options) => ChartScale::Category(CategoryScale::new(options.clone(), labels.to_vec())),
            AxisOptions::Linear(options) => ChartScale::Linear(LinearScale::new(options.clone())),
        }
    }

    pub fn scale(&self) -> &dyn Scale {
        match self {
            ChartScale::Category(scale) => scale,
            ChartScale::Linear(scale) => scale,
            ChartScale::Radial(scale) => scale,
        }
    }

    pub fn scale_mut(&mut self) -> &mut dyn Scale {
        match self {
            ChartScale::Category(scale) => scale,
            ChartScale::Linear(scale) => scale,
            ChartScale::Radial(scale) => scale,
        }
    }

    pub fn id(&self) -> &str {
        self.scale().id()
    }

    pub fn as_category(&self) -> Option<&CategoryScale> {
        match self {
            ChartScale::Category(scale) => Some(scale),
            _ => None,
        }
    }

    pub fn as_linear(&self) -> Option<&LinearScale> {
        match self {
            ChartScale::Linear(scale) => Some(scale),
            _ => None,
        }
    }

    pub fn as_radial(&self) -> Option<&RadialScale> {
        match self {
            ChartScale::Radial(scale) => Some(scale),
            _ => None,
        }
    }

    /// Pixel along this axis of value `index`: the category slot, or the
    /// index itself as a number on a linear axis
    pub fn pixel_for_index(&self, index: usize) -> f64 {
        match self {
            ChartScale::Category(scale) => scale.pixel_for_index(index, true),
            ChartScale::Linear(scale) => scale.pixel_for_value(index as f64),
            ChartScale::Radial(scale) => scale.center().0,
        }
    }
}

/// Which axis list a dataset binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    X,
    Y,
}

/// All scales of a chart, in layout order
#[derive(Debug, Clone, Default)]
pub struct ScaleSet {
    scales: Vec<ChartScale>,
    x_ids: Vec<String>,
    y_ids: Vec<String>,
}

impl ScaleSet {
    /// Build the scales named by `options` and feed them `data`
    pub fn build(options: &ChartOptions, data: &ChartData) -> Self {
        let mut set = Self::default();
        for axis in &options.scales.x_axes {
            set.x_ids.push(axis.id().to_string());
            set.scales.push(ChartScale::from_axis(axis, &data.labels));
        }
        for axis in &options.scales.y_axes {
            set.y_ids.push(axis.id().to_string());
            set.scales.push(ChartScale::from_axis(axis, &data.labels));
        }
        if let Some(radial) = &options.scale {
            set.scales
                .push(ChartScale::Radial(RadialScale::new(radial.clone(), data.labels.clone())));
        }
        set.feed(data);
        set
    }

    fn feed(&mut self, data: &ChartData) {
        let visible = data.visible_indices();
        let bound: Vec<(String, Vec<usize>)> = self
            .scales
            .iter()
            .map(|scale| {
                let id = scale.id().to_string();
                let indices = visible
                    .iter()
                    .copied()
                    .filter(|&i| self.binds(data, i, &id))
                    .collect();
                (id, indices)
            })
            .collect();

        for (scale, (_, indices)) in self.scales.iter_mut().zip(bound) {
            let values = || {
                indices
                    .iter()
                    .filter_map(|&i| data.datasets.get(i))
                    .flat_map(|d| d.data.iter().copied())
                    .collect::<Vec<_>>()
            };
            match scale {
                ChartScale::Linear(linear) if linear.options().stacked => linear.set_data(data.stacked_totals(&indices)),
                ChartScale::Linear(linear) => linear.set_data(values()),
                ChartScale::Radial(radial) => radial.set_data(values()),
                ChartScale::Category(_) => {}
            }
        }
    }

    /// True if dataset `index` plots against scale `id`
    fn binds(&self, data: &ChartData, index: usize, id: &str) -> bool {
        let Some(dataset) = data.datasets.get(index) else {
            return false;
        };
        if self.x_ids.iter().any(|x| x == id) {
            return dataset.x_axis_id.as_deref().or(self.x_ids.first().map(String::as_str)) == Some(id);
        }
        if self.y_ids.iter().any(|y| y == id) {
            return dataset.y_axis_id.as_deref().or(self.y_ids.first().map(String::as_str)) == Some(id);
        }
        true
    }

    pub fn get(&self, id: &str) -> Option<&ChartScale> {
        self.scales.iter().find(|scale| scale.id() == id)
    }

    /// The axis a dataset binds to: `id` if given, else the first of its
    /// direction
    pub fn axis(&self, direction: AxisDirection, id: Option<&str>) -> Option<&ChartScale> {
        let ids = match direction {
            AxisDirection::X => &self.x_ids,
            AxisDirection::Y => &self.y_ids,
        };
        let id = id.or(ids.first().map(String::as_str))?;
        self.get(id)
    }

    pub fn radial(&self) -> Option<&RadialScale> {
        self.scales.iter().find_map(ChartScale::as_radial)
    }

    pub fn geometry(&self, id: &str) -> Option<ScaleGeometry> {
        self.get(id).map(|scale| scale.scale().geometry())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartScale> {
        self.scales.iter()
    }

    pub(crate) fn scales_mut(&mut self) -> &mut [ChartScale] {
        &mut self.scales
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dataset;
    use chart_config::{DefaultsRegistry, OptionsResolver};
    use serde_json::json;

    fn options(chart_type: &str, user: serde_json::Value) -> ChartOptions {
        let resolved = DefaultsRegistry::standard().resolve(chart_type, &user).unwrap();
        ChartOptions::from_resolved(&resolved).unwrap()
    }

    #[test]
    fn test_bar_scales() {
        let data = ChartData::new(["a", "b"]).with_dataset(Dataset::new("one", [1.0, 2.0]));
        let set = ScaleSet::build(&options("bar", json!({})), &data);
        assert_eq!(set.len(), 2);
        assert!(set.axis(AxisDirection::X, None).unwrap().as_category().is_some());
        assert_eq!(set.axis(AxisDirection::Y, None).unwrap().id(), "y-axis-0");
        assert!(set.radial().is_none());
    }

    #[test]
    fn test_radar_has_radial_scale() {
        let data = ChartData::new(["a", "b", "c"]).with_dataset(Dataset::new("one", [1.0, 2.0, 3.0]));
        let set = ScaleSet::build(&options("radar", json!({})), &data);
        assert_eq!(set.len(), 1);
        assert_eq!(set.radial().unwrap().point_count(), 3);
    }

    #[test]
    fn test_doughnut_has_no_scales() {
        let set = ScaleSet::build(&options("doughnut", json!({})), &ChartData::default());
        assert!(set.is_empty());
    }

    #[test]
    fn test_datasets_bind_by_axis_id() {
        let user = json!({
            "scales": {
                "yAxes": [
                    { "type": "linear", "id": "left" },
                    { "type": "linear", "id": "right", "position": "right" }
                ]
            }
        });
        let mut second = Dataset::new("two", [500.0]);
        second.y_axis_id = Some("right".to_string());
        let data = ChartData::new(["a"])
            .with_dataset(Dataset::new("one", [5.0]))
            .with_dataset(second);
        let set = ScaleSet::build(&options("bar", user), &data);
        assert!(set.binds(&data, 0, "left"));
        assert!(!set.binds(&data, 0, "right"));
        assert!(set.binds(&data, 1, "right"));
        assert_eq!(set.axis(AxisDirection::Y, Some("right")).unwrap().id(), "right");
    }
}
