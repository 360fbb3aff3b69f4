//! CART regression tree

use super::{validate_training_data, FittedRegressor, Regressor};
use crate::error::{InflationError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree (None = grow until leaves are pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Maximum features to consider for split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

/// Tree node, stored in a flat arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
        n_samples: usize,
    },
    /// Rows with `row[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        n_samples: usize,
    },
}

/// Unfitted regression tree
#[derive(Debug, Clone)]
pub struct DecisionTreeRegressor {
    config: TreeConfig,
}

/// Fitted regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTree {
    nodes: Vec<TreeNode>,
    importances: Vec<f64>,
    n_features: usize,
}

impl DecisionTreeRegressor {
    /// Create a new decision tree with config
    pub fn new(config: TreeConfig) -> Self {
        Self { config }
    }

    /// Fit on the rows named by `indices`; repeated indices weigh a row more
    pub fn fit_indices(
        &self,
        features: &[Vec<f64>],
        target: &[f64],
        indices: &[usize],
    ) -> Result<FittedTree> {
        let n_features = validate_training_data(features, target)?;
        if indices.is_empty() {
            return Err(InflationError::Validation(
                "Cannot fit a tree on zero rows".to_string(),
            ));
        }
        if self.config.min_samples_leaf == 0 || self.config.min_samples_split < 2 {
            return Err(InflationError::InvalidParameter(
                "min_samples_leaf must be >= 1 and min_samples_split >= 2".to_string(),
            ));
        }

        let mut builder = TreeBuilder {
            config: &self.config,
            features,
            target,
            max_features: self
                .config
                .max_features
                .unwrap_or(n_features)
                .clamp(1, n_features),
            rng: ChaCha8Rng::seed_from_u64(self.config.seed),
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        builder.build(indices.to_vec(), 0);

        let mut importances = builder.importances;
        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut importances {
                *imp /= sum;
            }
        }

        Ok(FittedTree {
            nodes: builder.nodes,
            importances,
            n_features,
        })
    }
}

impl Regressor for DecisionTreeRegressor {
    type Fitted = FittedTree;

    fn fit(&self, features: &[Vec<f64>], target: &[f64]) -> Result<FittedTree> {
        let indices: Vec<usize> = (0..features.len()).collect();
        self.fit_indices(features, target, &indices)
    }

    fn name(&self) -> &str {
        "Decision Tree Regressor"
    }
}

impl FittedTree {
    /// Depth of the deepest leaf, a single leaf having depth 1
    pub fn depth(&self) -> usize {
        fn depth_of(nodes: &[TreeNode], id: usize) -> usize {
            match &nodes[id] {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => {
                    1 + depth_of(nodes, *left).max(depth_of(nodes, *right))
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            depth_of(&self.nodes, 0)
        }
    }

    /// Number of leaves
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }

    /// All nodes, root first
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }
}

impl FittedRegressor for FittedTree {
    fn predict_one(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(TreeNode::Leaf { value, .. }) => return *value,
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                }) => {
                    let value = row.get(*feature).copied().unwrap_or(f64::NAN);
                    id = if value <= *threshold { *left } else { *right };
                }
                None => return f64::NAN,
            }
        }
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    config: &'a TreeConfig,
    features: &'a [Vec<f64>],
    target: &'a [f64],
    max_features: usize,
    rng: ChaCha8Rng,
    nodes: Vec<TreeNode>,
    importances: Vec<f64>,
}

impl<'a> TreeBuilder<'a> {
    /// Grow a subtree and return its node id
    fn build(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let n = indices.len();
        let mean = indices.iter().map(|&i| self.target[i]).sum::<f64>() / n as f64;
        let sse: f64 = indices
            .iter()
            .map(|&i| (self.target[i] - mean).powi(2))
            .sum();

        let id = self.nodes.len();
        self.nodes.push(TreeNode::Leaf {
            value: mean,
            n_samples: n,
        });

        let depth_reached = self.config.max_depth.map_or(false, |d| depth >= d);
        if depth_reached
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf
            || sse <= 0.0
        {
            return id;
        }

        let split = match self.find_best_split(&indices, mean, sse) {
            Some(split) => split,
            None => return id,
        };
        self.importances[split.feature] += split.gain;

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.features[i][split.feature] <= split.threshold);

        let left = self.build(left_idx, depth + 1);
        let right = self.build(right_idx, depth + 1);
        self.nodes[id] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            n_samples: n,
        };
        id
    }

    /// Best variance-reduction split over a random feature subset
    fn find_best_split(&mut self, indices: &[usize], mean: f64, sse: f64) -> Option<BestSplit> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf;

        let mut candidates: Vec<usize> = (0..self.importances.len()).collect();
        candidates.shuffle(&mut self.rng);
        candidates.truncate(self.max_features);

        let mut best: Option<BestSplit> = None;
        let mut best_gain = sse * 1e-12;

        for feature in candidates {
            // (feature value, centred target)
            let mut column: Vec<(f64, f64)> = indices
                .iter()
                .map(|&i| (self.features[i][feature], self.target[i] - mean))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let total: f64 = column.iter().map(|(_, y)| y).sum();
            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for k in 0..n - 1 {
                let (x, y) = column[k];
                left_sum += y;
                left_sq += y * y;

                let n_left = k + 1;
                let n_right = n - n_left;
                if n_right < min_leaf {
                    break;
                }
                if n_left < min_leaf || x == column[k + 1].0 {
                    continue;
                }

                let right_sum = total - left_sum;
                let right_sq = sse - left_sq;
                let sse_left = left_sq - left_sum * left_sum / n_left as f64;
                let sse_right = right_sq - right_sum * right_sum / n_right as f64;
                let gain = sse - sse_left - sse_right;

                if gain > best_gain {
                    let next = column[k + 1].0;
                    let mut threshold = (x + next) / 2.0;
                    if threshold >= next {
                        threshold = x;
                    }
                    best_gain = gain;
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_function_is_learned_exactly() {
        let features: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64]).collect();
        let target: Vec<f64> = (0..20).map(|i| if i < 10 { 1.0 } else { 5.0 }).collect();

        let tree = DecisionTreeRegressor::new(TreeConfig::default())
            .fit(&features, &target)
            .unwrap();

        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.predict_one(&[3.0]), 1.0);
        assert_eq!(tree.predict_one(&[9.5]), 1.0);
        assert_eq!(tree.predict_one(&[9.6]), 5.0);
        assert_eq!(tree.predict_one(&[15.0]), 5.0);
        assert_eq!(tree.feature_importances(), &[1.0]);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let features: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64]).collect();
        let target: Vec<f64> = (0..64).map(|i| (i * i) as f64).collect();

        let tree = DecisionTreeRegressor::new(TreeConfig {
            max_depth: Some(3),
            ..Default::default()
        })
        .fit(&features, &target)
        .unwrap();

        assert!(tree.depth() <= 4);
        assert!(tree.n_leaves() <= 8);
    }

    #[test]
    fn test_irrelevant_feature_gets_no_importance() {
        let features: Vec<Vec<f64>> = (0..30).map(|i| vec![i as f64, 7.0]).collect();
        let target: Vec<f64> = (0..30).map(|i| i as f64 * 2.0).collect();

        let tree = DecisionTreeRegressor::new(TreeConfig::default())
            .fit(&features, &target)
            .unwrap();

        assert_eq!(tree.feature_importances()[1], 0.0);
        assert!((tree.feature_importances()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let features: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let target = vec![3.0; 10];

        let tree = DecisionTreeRegressor::new(TreeConfig::default())
            .fit(&features, &target)
            .unwrap();

        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.predict_one(&[100.0]), 3.0);
    }
}
