//! Error types for the inflation_forecast crate

use macro_math::MathError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the inflation_forecast crate
#[derive(Debug, Error)]
pub enum InflationError {
    /// A source or uploaded table is missing, empty or malformed
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// An uploaded table lacks columns the model was trained on
    #[error("Schema mismatch: missing required column(s) {}", .missing.join(", "))]
    SchemaMismatch {
        /// Missing column names, in training order
        missing: Vec<String>,
    },

    /// Target values are invalid for a requested metric
    #[error("Metric computation error: {0}")]
    MetricComputation(String),

    /// Inference was requested before a model exists
    #[error("Model not trained: train a model before requesting predictions")]
    ModelNotTrained,

    /// Error related to data validation or processing
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from configuration parsing
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),

    /// Error from CSV writing
    #[error("CSV error: {0}")]
    Csv(String),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, InflationError>;

impl From<PolarsError> for InflationError {
    fn from(err: PolarsError) -> Self {
        InflationError::Polars(err.to_string())
    }
}

impl From<csv::Error> for InflationError {
    fn from(err: csv::Error) -> Self {
        InflationError::Csv(err.to_string())
    }
}

impl From<toml::de::Error> for InflationError {
    fn from(err: toml::de::Error) -> Self {
        InflationError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for InflationError {
    fn from(err: serde_json::Error) -> Self {
        InflationError::Serialization(err.to_string())
    }
}

impl From<MathError> for InflationError {
    fn from(err: MathError) -> Self {
        InflationError::MetricComputation(err.to_string())
    }
}

impl InflationError {
    /// Short error kind name for user-facing messages
    pub fn kind(&self) -> &'static str {
        match self {
            InflationError::DataLoad(_) => "DataLoadError",
            InflationError::SchemaMismatch { .. } => "SchemaMismatchError",
            InflationError::MetricComputation(_) => "MetricComputationError",
            InflationError::ModelNotTrained => "ModelNotTrainedError",
            InflationError::Validation(_) => "ValidationError",
            InflationError::InvalidParameter(_) => "InvalidParameterError",
            InflationError::Config(_) => "ConfigError",
            InflationError::Io(_) => "IoError",
            InflationError::Polars(_) => "PolarsError",
            InflationError::Csv(_) => "CsvError",
            InflationError::Serialization(_) => "SerializationError",
        }
    }
}
