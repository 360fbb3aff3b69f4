//! Model training and hold-out evaluation

use crate::config::{EvaluationConfig, PipelineConfig};
use crate::features::AssembledData;
use crate::models::{FittedForest, FittedRegressor, ForestConfig, RandomForestRegressor, Regressor};
use crate::error::{InflationError, Result};
use chrono::NaiveDate;
use macro_math::RegressionMetrics;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Importance score of one predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// One held-out row with its prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRow {
    pub period: NaiveDate,
    pub predicted: f64,
    pub actual: f64,
}

/// A fitted forest with its evaluation results
#[derive(Debug, Clone)]
pub struct TrainedModel {
    /// Fitted ensemble
    pub forest: FittedForest,
    /// Predictor names in training order
    pub feature_names: Vec<String>,
    /// Target column
    pub target_name: String,
    /// Metrics over the held-out rows
    pub metrics: RegressionMetrics,
    /// Every predictor, ranked by importance
    pub importances: Vec<FeatureImportance>,
    /// Leading entries of `importances`
    pub top_features: Vec<FeatureImportance>,
    /// Held-out predictions in period order
    pub evaluation: Vec<EvaluationRow>,
    /// Held-out predictor rows, aligned with `evaluation`
    pub test_features: Vec<Vec<f64>>,
    /// Number of training rows
    pub train_rows: usize,
    /// Number of held-out rows
    pub test_rows: usize,
}

impl TrainedModel {
    /// Predict rows whose values are in training feature order
    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        self.forest.predict(rows)
    }
}

/// Fits a random forest and evaluates it on held-out rows
#[derive(Debug, Clone)]
pub struct Trainer {
    model: ForestConfig,
    evaluation: EvaluationConfig,
}

impl Trainer {
    /// Create a trainer
    pub fn new(model: ForestConfig, evaluation: EvaluationConfig) -> Self {
        Self { model, evaluation }
    }

    /// Trainer for a pipeline configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.model.clone(), config.evaluation.clone())
    }

    /// Train on the training split and evaluate on the held-out split
    pub fn train(&self, data: &AssembledData) -> Result<TrainedModel> {
        self.model.validate()?;
        let holdout = &self.evaluation.holdout;
        if !holdout.is_chronological() {
            warn!("random hold-out mixes later periods into training; metrics will be optimistic");
        }

        let (train_idx, test_idx) = holdout.split(data.n_samples())?;
        let train = data.subset(&train_idx);
        let test = data.subset(&test_idx);

        let regressor = RandomForestRegressor::new(self.model.clone());
        let forest = regressor.fit(&train.features, &train.target)?;

        let predicted = forest.predict(&test.features);
        let metrics = RegressionMetrics::compute(&test.target, &predicted, self.evaluation.rmsle)
            .map_err(|e| InflationError::MetricComputation(e.to_string()))?;

        let importances = rank_importances(&data.feature_names, forest.feature_importances());
        let top_features = importances
            .iter()
            .take(self.evaluation.top_features)
            .cloned()
            .collect();

        let evaluation = test
            .periods
            .iter()
            .zip(predicted.iter().zip(test.target.iter()))
            .map(|(period, (p, a))| EvaluationRow {
                period: *period,
                predicted: *p,
                actual: *a,
            })
            .collect();

        let (train_rows, test_rows) = (train.n_samples(), test.n_samples());
        info!(
            model = regressor.name(),
            train_rows,
            test_rows,
            r2 = metrics.r2,
            mae = metrics.mae,
            "trained model"
        );

        Ok(TrainedModel {
            forest,
            feature_names: data.feature_names.clone(),
            target_name: data.target_name.clone(),
            metrics,
            importances,
            top_features,
            evaluation,
            test_features: test.features,
            train_rows,
            test_rows,
        })
    }
}

/// Pair names with scores and sort descending; ties keep feature order
pub fn rank_importances(names: &[String], scores: &[f64]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = names
        .iter()
        .zip(scores.iter())
        .map(|(feature, importance)| FeatureImportance {
            feature: feature.clone(),
            importance: *importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_is_stable() {
        let names: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let ranked = rank_importances(&names, &[0.1, 0.4, 0.1, 0.4]);
        let order: Vec<&str> = ranked.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }
}
