//! Error types for the charts crate

use crate::model::ChartId;
use animation::AnimationError;
use chart_config::ConfigError;
use scales::ScaleError;
use thiserror::Error;

/// Errors that can occur when working with charts
#[derive(Error, Debug)]
pub enum ChartError {
    /// Options could not be resolved
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Animation settings were rejected
    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    /// A scale rejected its options
    #[error("Scale error: {0}")]
    Scale(#[from] ScaleError),

    /// No controller is registered for the chart type
    #[error("Invalid chart type: {0}")]
    InvalidChartType(String),

    /// Data does not fit the chart's scales
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The chart was destroyed or never registered
    #[error("Chart not found: {0}")]
    ChartNotFound(ChartId),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Serialization(err.to_string())
    }
}

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
