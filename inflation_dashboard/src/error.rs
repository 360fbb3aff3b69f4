//! Error types for the inflation_dashboard crate

use inflation_forecast::InflationError;
use macro_math::MathError;
use thiserror::Error;

/// Errors raised while building the dashboard
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Pipeline error from loading, assembly, training or inference
    #[error(transparent)]
    Pipeline(#[from] InflationError),

    /// Statistics behind a chart could not be computed
    #[error("Statistics error: {0}")]
    Math(#[from] MathError),

    /// Chart encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Nothing to draw
    #[error("Chart error: {0}")]
    Chart(String),

    /// Error from configuration parsing
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report text formatting failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl DashboardError {
    /// Short error kind name shown in notices
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::Pipeline(err) => err.kind(),
            DashboardError::Math(_) => "StatisticsError",
            DashboardError::Image(_) => "ImageError",
            DashboardError::Chart(_) => "ChartError",
            DashboardError::Config(_) => "ConfigError",
            DashboardError::Io(_) => "IoError",
            DashboardError::Format(_) => "FormatError",
        }
    }
}

impl From<toml::de::Error> for DashboardError {
    fn from(err: toml::de::Error) -> Self {
        DashboardError::Config(err.to_string())
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, DashboardError>;
