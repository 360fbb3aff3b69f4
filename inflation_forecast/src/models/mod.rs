//! Regression models for inflation prediction

use crate::error::{InflationError, Result};
use std::fmt::Debug;

pub mod decision_tree;
pub mod random_forest;

pub use decision_tree::{DecisionTreeRegressor, FittedTree, TreeConfig, TreeNode};
pub use random_forest::{FittedForest, ForestConfig, RandomForestRegressor};

/// Fitted regression model
pub trait FittedRegressor: Debug {
    /// Predict a single row
    fn predict_one(&self, row: &[f64]) -> f64;

    /// Predict every row, preserving order
    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }

    /// Normalised impurity-decrease importance per feature
    fn feature_importances(&self) -> &[f64];

    /// Number of features the model was fitted on
    fn n_features(&self) -> usize;
}

/// Regression model that can be fitted on a feature matrix
pub trait Regressor: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedRegressor;

    /// Fit the model on row-major features and a target vector
    fn fit(&self, features: &[Vec<f64>], target: &[f64]) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Check that a feature matrix and target are usable for fitting
pub(crate) fn validate_training_data(features: &[Vec<f64>], target: &[f64]) -> Result<usize> {
    if features.is_empty() {
        return Err(InflationError::Validation(
            "Cannot fit a model on zero rows".to_string(),
        ));
    }
    if features.len() != target.len() {
        return Err(InflationError::Validation(format!(
            "Feature rows ({}) don't match target length ({})",
            features.len(),
            target.len()
        )));
    }

    let n_features = features[0].len();
    if n_features == 0 {
        return Err(InflationError::Validation(
            "Cannot fit a model without features".to_string(),
        ));
    }
    if let Some(row) = features.iter().position(|r| r.len() != n_features) {
        return Err(InflationError::Validation(format!(
            "Row {} has {} features, expected {}",
            row,
            features[row].len(),
            n_features
        )));
    }
    if features.iter().flatten().chain(target.iter()).any(|v| !v.is_finite()) {
        return Err(InflationError::Validation(
            "Training data must be finite".to_string(),
        ));
    }

    Ok(n_features)
}
