//! Descriptive statistics behind the correlation and distribution charts
//!
//! Contains:
//! - Pearson correlation and pairwise correlation matrices
//! - Fixed-width histograms
//! - Gaussian kernel density estimates

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Pearson correlation coefficient of two equally long series
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Series lengths differ ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(MathError::InsufficientData(
            "Correlation needs at least two observations".to_string(),
        ));
    }

    let mean_x = x.iter().mean();
    let mean_y = y.iter().mean();

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Err(MathError::CalculationError(
            "Correlation is undefined for a constant series".to_string(),
        ));
    }

    Ok(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Symmetric matrix of pairwise Pearson correlations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Column labels, in row/column order
    pub labels: Vec<String>,
    /// Coefficients; `None` where the pair has fewer than two complete
    /// observations or a constant side
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Number of variables
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Coefficient for a pair of labels
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        self.values[i][j]
    }
}

/// Correlation matrix over named columns with missing values.
///
/// Each pair uses the rows where both columns are present.
pub fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> Result<CorrelationMatrix> {
    if columns.is_empty() {
        return Err(MathError::InsufficientData(
            "No columns to correlate".to_string(),
        ));
    }
    let height = columns[0].1.len();
    if let Some((name, _)) = columns.iter().find(|(_, c)| c.len() != height) {
        return Err(MathError::InvalidInput(format!(
            "Column '{}' has a different length",
            name
        )));
    }

    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let (x, y): (Vec<f64>, Vec<f64>) = columns[i]
                .1
                .iter()
                .zip(columns[j].1.iter())
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();

            let r = if i == j {
                pearson(&x, &y).ok().map(|_| 1.0)
            } else {
                pearson(&x, &y).ok()
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        labels: columns.iter().map(|(name, _)| name.clone()).collect(),
        values,
    })
}

/// Fixed-width histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` values
    pub edges: Vec<f64>,
    /// Observation count per bin
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Width of one bin
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Largest bin count
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Total number of observations
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin `values` into `bins` equal-width bins spanning their range.
///
/// The last bin is closed on the right. A constant series gets a unit-wide
/// range centred on its value.
pub fn histogram(values: &[f64], bins: usize) -> Result<Histogram> {
    if bins == 0 {
        return Err(MathError::InvalidInput(
            "Bin count must be greater than zero".to_string(),
        ));
    }
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Histogram needs at least one value".to_string(),
        ));
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return Err(MathError::InvalidInput("Values must be finite".to_string()));
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(Histogram { edges, counts })
}

/// Gaussian kernel density estimate evaluated at `grid`.
///
/// Bandwidth follows Scott's rule, `std * n^(-1/5)`.
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Result<Vec<f64>> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(
            "Density estimate needs at least two values".to_string(),
        ));
    }

    let std_dev = values.iter().std_dev();
    if !(std_dev > 0.0) {
        return Err(MathError::CalculationError(
            "Density estimate is undefined for a constant series".to_string(),
        ));
    }
    let bandwidth = std_dev * (values.len() as f64).powf(-0.2);
    let kernel = Normal::new(0.0, bandwidth)
        .map_err(|e| MathError::CalculationError(e.to_string()))?;

    let n = values.len() as f64;
    Ok(grid
        .iter()
        .map(|&x| values.iter().map(|&v| kernel.pdf(x - v)).sum::<f64>() / n)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn perfect_correlation() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| v * 3.0 + 1.0).collect();
        assert_approx_eq!(pearson(&x, &y).unwrap(), 1.0);

        let z: Vec<f64> = x.iter().map(|v| -v).collect();
        assert_approx_eq!(pearson(&x, &z).unwrap(), -1.0);
    }

    #[test]
    fn constant_series_is_undefined() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn histogram_counts_everything() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let hist = histogram(&values, 10).unwrap();
        assert_eq!(hist.counts.len(), 10);
        assert_eq!(hist.edges.len(), 11);
        assert_eq!(hist.total(), 100);
        assert_eq!(hist.counts[9], 10);
    }
}
