//! Elements - the shapes a chart is drawn with
//!
//! Each shape reads its resolved pixel geometry from an element's
//! [`animation::ViewState`] and implements the [`Drawable`] capability:
//! drawing onto a [`canvas::Canvas`], hit testing and tooltip anchoring.

pub mod keys;
mod drawable;
mod point;
mod arc;
mod rectangle;
mod line;
mod element;

pub use drawable::*;
pub use point::*;
pub use arc::*;
pub use rectangle::*;
pub use line::*;
pub use element::*;
