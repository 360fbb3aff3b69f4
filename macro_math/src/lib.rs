//! # Macro Math
//!
//! Numeric kernels used by the inflation pipeline.
//! This crate provides regression evaluation metrics and the descriptive
//! statistics behind the correlation and distribution charts.

use thiserror::Error;

pub mod metrics;
pub mod statistics;

/// Errors that can occur in metric and statistics calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for metric and statistics operations
pub type Result<T> = std::result::Result<T, MathError>;

pub use metrics::{
    mean_absolute_error, r2_score, root_mean_squared_error, root_mean_squared_log_error,
    RegressionMetrics,
};
pub use statistics::{correlation_matrix, gaussian_kde, histogram, pearson, CorrelationMatrix, Histogram};
