//! Scales - axis domains and pixel geometry
//!
//! This crate provides:
//! - Nice-number range selection for numeric axes
//! - Bounded tick generation for user min, max and step settings
//! - Label rotation fitting for category axes
//! - Radius and center solving for radial scales
//! - Linear, category and radial scales implementing the fit protocol

mod error;
mod range;
mod ticks;
mod label_fit;
mod radial_layout;
mod options;
mod scale;
mod linear;
mod category;
mod radial;

pub use error::*;
pub use range::*;
pub use ticks::*;
pub use label_fit::*;
pub use radial_layout::*;
pub use options::*;
pub use scale::*;
pub use linear::*;
pub use category::*;
pub use radial::*;
