//! Error types for the animation crate

use thiserror::Error;

/// Errors that can occur while configuring or running animations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// A color string the color capability cannot parse
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// An easing name that is not in the catalogue
    #[error("Unknown easing: {0}")]
    UnknownEasing(String),

    /// Malformed animation configuration
    #[error("Invalid animation config: {0}")]
    InvalidConfig(String),

    /// A frame render callback failed
    #[error("Render error: {0}")]
    Render(String),
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        AnimationError::InvalidConfig(err.to_string())
    }
}

/// Result type for animation operations
pub type AnimationResult<T> = Result<T, AnimationError>;
