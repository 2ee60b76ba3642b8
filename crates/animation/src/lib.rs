//! Animation - property transitions and frame scheduling
//!
//! This crate provides:
//! - The easing catalogue
//! - Animated values and the color-mixing capability
//! - Per-property animation configuration
//! - `AnimationProperty`, a single in-flight transition
//! - `ViewState`, an element's animated state including shared options
//! - `AnimationsCoordinator`, which decides how each update is applied
//! - `AnimationScheduler`, the frame driver with drop-frame compensation

mod error;
mod easing;
mod value;
mod color;
mod config;
mod property;
mod options;
mod view_state;
mod coordinator;
mod clock;
mod scheduler;

pub use error::*;
pub use easing::*;
pub use value::*;
pub use color::*;
pub use config::*;
pub use property::*;
pub use options::*;
pub use view_state::*;
pub use coordinator::*;
pub use clock::*;
pub use scheduler::*;
