//! Error types for the scales crate

use thiserror::Error;

/// Errors that can occur when configuring scales
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    /// Explicit range override that cannot produce ticks
    #[error("Invalid range override: {0}")]
    InvalidOverride(String),

    /// Scale options that cannot be used
    #[error("Invalid scale options: {0}")]
    InvalidOptions(String),
}

/// Result type for scale operations
pub type ScaleResult<T> = Result<T, ScaleError>;
