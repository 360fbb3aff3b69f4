//! Regression metrics for evaluating held-out predictions
//!
//! All functions take `(actual, predicted)` in that order and require both
//! slices to have the same non-zero length.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "Actual and predicted values must be non-empty".to_string(),
        ));
    }
    if actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual length ({}) doesn't match predicted length ({})",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.iter().chain(predicted.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Values must be finite".to_string(),
        ));
    }
    Ok(())
}

/// Mean absolute error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;

    Ok(mse.sqrt())
}

/// Coefficient of determination.
///
/// A constant `actual` vector scores 1.0 when predicted exactly and 0.0
/// otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;

    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}

/// Root mean squared log error, `sqrt(mean((ln(1 + p) - ln(1 + a))^2))`.
///
/// Every actual and predicted value must be strictly positive.
pub fn root_mean_squared_log_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    if let Some((i, v)) = actual.iter().enumerate().find(|(_, &v)| v <= 0.0) {
        return Err(MathError::InvalidInput(format!(
            "RMSLE requires positive targets, found {} at position {}",
            v, i
        )));
    }
    if let Some((i, v)) = predicted.iter().enumerate().find(|(_, &v)| v <= 0.0) {
        return Err(MathError::InvalidInput(format!(
            "RMSLE requires positive predictions, found {} at position {}",
            v, i
        )));
    }

    let msle = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (p.ln_1p() - a.ln_1p()).powi(2))
        .sum::<f64>()
        / actual.len() as f64;

    Ok(msle.sqrt())
}

/// Metric snapshot for a set of held-out predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Coefficient of determination
    pub r2: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Root Mean Squared Log Error, when requested
    pub rmsle: Option<f64>,
    /// Number of predictions the metrics were computed from
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Compute every metric; RMSLE only when `with_rmsle` is set
    pub fn compute(actual: &[f64], predicted: &[f64], with_rmsle: bool) -> Result<Self> {
        let rmsle = if with_rmsle {
            Some(root_mean_squared_log_error(actual, predicted)?)
        } else {
            None
        };

        Ok(Self {
            r2: r2_score(actual, predicted)?,
            mae: mean_absolute_error(actual, predicted)?,
            rmse: root_mean_squared_error(actual, predicted)?,
            rmsle,
            n_samples: actual.len(),
        })
    }
}

impl std::fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Hold-out Metrics ({} rows):", self.n_samples)?;
        writeln!(f, "  R²:    {:.4}", self.r2)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        match self.rmsle {
            Some(rmsle) => writeln!(f, "  RMSLE: {:.4}", rmsle)?,
            None => writeln!(f, "  RMSLE: n/a")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let actual = vec![1.0, 2.0, 3.0];
        assert_eq!(r2_score(&actual, &actual).unwrap(), 1.0);
        assert_eq!(mean_absolute_error(&actual, &actual).unwrap(), 0.0);
        assert_eq!(root_mean_squared_log_error(&actual, &actual).unwrap(), 0.0);
    }

    #[test]
    fn constant_actuals() {
        let actual = vec![5.0, 5.0];
        assert_eq!(r2_score(&actual, &[5.0, 5.0]).unwrap(), 1.0);
        assert_eq!(r2_score(&actual, &[4.0, 6.0]).unwrap(), 0.0);
    }

    #[test]
    fn mismatched_lengths() {
        assert!(matches!(
            mean_absolute_error(&[1.0, 2.0], &[1.0]),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            r2_score(&[], &[]),
            Err(MathError::InsufficientData(_))
        ));
    }
}
