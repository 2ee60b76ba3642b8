//! Chart configuration - merging, defaults and typed views
//!
//! This crate provides:
//! - `config_merge`, the merge rule every options layer is combined with
//! - The global and per-chart-type defaults
//! - `DefaultsRegistry`, which resolves a chart type's full options
//! - Typed views over the resolved options tree

mod error;
mod merge;
mod defaults;
mod resolver;
mod typed;

pub use error::*;
pub use merge::*;
pub use defaults::*;
pub use resolver::*;
pub use typed::*;
