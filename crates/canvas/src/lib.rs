//! Canvas - drawing-surface capability for the chart engine
//!
//! This crate provides:
//! - Font descriptions and their CSS font-string encoding
//! - The `TextMeasure` and `Canvas` capabilities consumed by scales and elements
//! - A recording canvas that captures draw calls for headless hosts and tests

mod font;
mod surface;
mod recording;

pub use font::*;
pub use surface::*;
pub use recording::*;
