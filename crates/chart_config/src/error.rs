//! Error types for the chart_config crate

use thiserror::Error;

/// Errors that can occur when resolving chart options
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No defaults are registered under this chart type name
    #[error("Unknown chart type: {0}")]
    UnknownChartType(String),

    /// Options that do not fit their typed view
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::InvalidOptions(err.to_string())
    }
}

impl From<animation::AnimationError> for ConfigError {
    fn from(err: animation::AnimationError) -> Self {
        ConfigError::InvalidOptions(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
