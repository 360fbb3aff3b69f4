//! Random forest regressor
//!
//! An ensemble of CART trees, each grown on a bootstrap sample of the
//! training rows. Trees are fitted sequentially from per-tree seeds derived
//! from the configured seed, so a fixed configuration always yields the same
//! forest.

use super::decision_tree::{DecisionTreeRegressor, FittedTree, TreeConfig};
use super::{validate_training_data, FittedRegressor, Regressor};
use crate::error::{InflationError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random forest configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees
    pub n_trees: usize,
    /// Maximum depth of each tree (None = unlimited)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Draw a bootstrap sample per tree
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(InflationError::InvalidParameter(
                "n_trees must be greater than zero".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(InflationError::InvalidParameter(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(InflationError::InvalidParameter(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(InflationError::InvalidParameter(
                "max_depth must be greater than zero".to_string(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(InflationError::InvalidParameter(
                "max_features must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn tree_config(&self, seed: u64) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
            seed,
        }
    }
}

/// Unfitted random forest
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    config: ForestConfig,
}

/// Fitted random forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedForest {
    config: ForestConfig,
    trees: Vec<FittedTree>,
    n_features: usize,
    importances: Vec<f64>,
}

impl RandomForestRegressor {
    /// Create a new random forest
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Configuration
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

impl Regressor for RandomForestRegressor {
    type Fitted = FittedForest;

    fn fit(&self, features: &[Vec<f64>], target: &[f64]) -> Result<FittedForest> {
        self.config.validate()?;
        let n_features = validate_training_data(features, target)?;
        let n = features.len();

        let mut trees = Vec::with_capacity(self.config.n_trees);
        for t in 0..self.config.n_trees {
            let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(t as u64));
            let indices: Vec<usize> = if self.config.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };

            let tree = DecisionTreeRegressor::new(self.config.tree_config(rng.gen()))
                .fit_indices(features, target, &indices)?;
            trees.push(tree);
        }

        let mut importances = vec![0.0; n_features];
        for tree in &trees {
            for (total, imp) in importances.iter_mut().zip(tree.feature_importances()) {
                *total += imp;
            }
        }
        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut importances {
                *imp /= sum;
            }
        }

        debug!(
            trees = trees.len(),
            rows = n,
            features = n_features,
            "fitted random forest"
        );

        Ok(FittedForest {
            config: self.config.clone(),
            trees,
            n_features,
            importances,
        })
    }

    fn name(&self) -> &str {
        "Random Forest Regressor"
    }
}

impl FittedForest {
    /// Configuration the forest was fitted with
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Fitted trees
    pub fn trees(&self) -> &[FittedTree] {
        &self.trees
    }
}

impl FittedRegressor for FittedForest {
    fn predict_one(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return f64::NAN;
        }
        self.trees.iter().map(|t| t.predict_one(row)).sum::<f64>() / self.trees.len() as f64
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}
