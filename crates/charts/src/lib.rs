//! Charts - animated chart instances
//!
//! This crate provides:
//! - The chart data model and configuration
//! - Scale sets and the box layout that sizes them around the chart area
//! - Dataset controllers for bar, line, radar and doughnut charts
//! - `Chart`, which retargets its elements on update and draws them
//! - `ChartRegistry`, which owns the defaults, the chart types and the frame scheduler

mod model;
mod error;
mod axes;
mod layout;
mod controllers;
mod chart;
mod registry;

pub use model::*;
pub use error::*;
pub use axes::*;
pub use layout::*;
pub use controllers::*;
pub use chart::*;
pub use registry::*;
