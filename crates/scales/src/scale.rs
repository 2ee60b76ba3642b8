//! Scale fit protocol
//!
//! Every scale kind is fit once per layout pass. Fitting resolves the
//! scale's own pixel bounds as a side effect; later fits in the same pass
//! and the chart area read those bounds.

use crate::options::Position;
use canvas::Canvas;
use serde::{Deserialize, Serialize};

/// Space already claimed around a scale by other scales
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Size a scale needs after fitting
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MinSize {
    pub width: f64,
    pub height: f64,
}

/// Pixel bounds of a cartesian scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl ScaleBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            right: left + width,
            top,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Same origin, new size
    pub fn resized(&self, width: f64, height: f64) -> Self {
        Self::new(self.left, self.top, width, height)
    }
}

/// Resolved geometry of any scale kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScaleGeometry {
    Cartesian(ScaleBounds),
    Radial {
        x_center: f64,
        y_center: f64,
        drawing_radius: f64,
    },
}

/// Behavior shared by every scale kind
pub trait Scale {
    /// Identifier datasets use to refer to this scale
    fn id(&self) -> &str;

    fn position(&self) -> Position;

    fn is_horizontal(&self) -> bool {
        self.position().is_horizontal()
    }

    /// Fit into at most `max_width` x `max_height` and resolve own bounds
    fn fit(&mut self, max_width: f64, max_height: f64, margins: Margins, ctx: &dyn Canvas) -> MinSize;

    /// Move the fitted scale to its final place
    fn place(&mut self, bounds: ScaleBounds);

    fn geometry(&self) -> ScaleGeometry;

    /// Draw grid lines and labels; `chart_area` bounds grid lines
    fn draw(&self, ctx: &mut dyn Canvas, chart_area: &ScaleBounds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_size() {
        let bounds = ScaleBounds::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(bounds.right, 110.0);
        assert_eq!(bounds.bottom, 70.0);
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 50.0);
    }

    #[test]
    fn test_resized_keeps_origin() {
        let bounds = ScaleBounds::new(10.0, 20.0, 100.0, 50.0).resized(5.0, 6.0);
        assert_eq!(bounds.left, 10.0);
        assert_eq!(bounds.top, 20.0);
        assert_eq!(bounds.width(), 5.0);
    }
}
