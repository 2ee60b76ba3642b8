//! Tagged element variants

use animation::ViewState;
use canvas::Canvas;
use serde::{Deserialize, Serialize};

use crate::arc::Arc;
use crate::drawable::{Drawable, TooltipPosition};
use crate::line::Line;
use crate::point::Point;
use crate::rectangle::Rectangle;

/// Shape used for each data value of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataElementKind {
    Point,
    Arc,
    Rectangle,
}

/// Any shape a chart draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Point(Point),
    Arc(Arc),
    Rectangle(Rectangle),
    Line(Line),
}

impl Element {
    /// Build the shape for one data value from its view state
    pub fn from_view(kind: DataElementKind, view: &ViewState) -> Self {
        match kind {
            DataElementKind::Point => Element::Point(Point::from_view(view)),
            DataElementKind::Arc => Element::Arc(Arc::from_view(view)),
            DataElementKind::Rectangle => Element::Rectangle(Rectangle::from_view(view)),
        }
    }

    fn shape(&self) -> &dyn Drawable {
        match self {
            Element::Point(point) => point,
            Element::Arc(arc) => arc,
            Element::Rectangle(rectangle) => rectangle,
            Element::Line(line) => line,
        }
    }
}

impl Drawable for Element {
    fn draw(&self, canvas: &mut dyn Canvas) {
        self.shape().draw(canvas);
    }

    fn in_range(&self, x: f64, y: f64) -> bool {
        self.shape().in_range(x, y)
    }

    fn in_group_range(&self, x: f64) -> bool {
        self.shape().in_group_range(x)
    }

    fn tooltip_position(&self) -> TooltipPosition {
        self.shape().tooltip_position()
    }
}
