//! Per-session state: the merged dataset and a cached trained model
//!
//! The model is retrained only when the assembled data or the trainer
//! configuration changes.

use crate::config::{EvaluationConfig, FeatureConfig, PipelineConfig};
use crate::data::{DataLoader, MacroFrame};
use crate::error::{InflationError, Result};
use crate::features::{AssembledData, FeatureAssembler};
use crate::inference::{PredictionResult, Predictor};
use crate::models::ForestConfig;
use crate::trainer::{TrainedModel, Trainer};
use polars::prelude::DataFrame;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{debug, info};

#[derive(Debug)]
struct CachedModel {
    fingerprint: u64,
    model: TrainedModel,
}

/// One dashboard session
#[derive(Debug)]
pub struct Session {
    config: PipelineConfig,
    frame: Option<MacroFrame>,
    cached: Option<CachedModel>,
    trainings: usize,
}

impl Session {
    /// Create a session; nothing is loaded until first use
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            frame: None,
            cached: None,
            trainings: 0,
        }
    }

    /// Session over an already merged frame
    pub fn with_frame(config: PipelineConfig, frame: MacroFrame) -> Self {
        let mut session = Self::new(config);
        session.frame = Some(frame);
        session
    }

    /// Configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Merged data, loading the configured sources on first use
    pub fn load(&mut self) -> Result<&MacroFrame> {
        if self.frame.is_none() {
            self.frame = Some(DataLoader::load(&self.config.data)?);
        }
        self.frame
            .as_ref()
            .ok_or_else(|| InflationError::DataLoad("no merged data".to_string()))
    }

    /// Merged data if loaded
    pub fn frame(&self) -> Option<&MacroFrame> {
        self.frame.as_ref()
    }

    /// Drop the loaded data and cached model
    pub fn reload(&mut self) {
        self.frame = None;
        self.invalidate();
    }

    /// Drop the cached model
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            debug!("invalidated cached model");
        }
    }

    /// Replace the feature configuration
    pub fn set_features(&mut self, features: FeatureConfig) {
        self.config.features = features;
        self.invalidate();
    }

    /// Replace the forest configuration
    pub fn set_model(&mut self, model: ForestConfig) {
        self.config.model = model;
        self.invalidate();
    }

    /// Replace the evaluation configuration
    pub fn set_evaluation(&mut self, evaluation: EvaluationConfig) {
        self.config.evaluation = evaluation;
        self.invalidate();
    }

    /// Assemble features and target from the merged data
    pub fn assemble(&mut self) -> Result<AssembledData> {
        let assembler = FeatureAssembler::new(self.config.features.clone());
        let frame = self.load()?;
        assembler.assemble(frame)
    }

    /// Trained model, fitting only when inputs changed since the last fit
    pub fn model(&mut self) -> Result<&TrainedModel> {
        let data = self.assemble()?;
        let fingerprint = self.fingerprint(&data)?;

        let fresh = matches!(&self.cached, Some(c) if c.fingerprint == fingerprint);
        if fresh {
            debug!(fingerprint, "reusing cached model");
        } else {
            let model = Trainer::from_config(&self.config).train(&data)?;
            self.trainings += 1;
            info!(fingerprint, trainings = self.trainings, "cached new model");
            self.cached = Some(CachedModel { fingerprint, model });
        }
        self.trained_model()
    }

    /// The cached model without training
    pub fn trained_model(&self) -> Result<&TrainedModel> {
        self.cached
            .as_ref()
            .map(|c| &c.model)
            .ok_or(InflationError::ModelNotTrained)
    }

    /// Number of fits performed by this session
    pub fn trainings(&self) -> usize {
        self.trainings
    }

    /// Predict an uploaded table with the cached model
    pub fn predict_upload(&self, upload: &DataFrame) -> Result<PredictionResult> {
        let model = self.trained_model()?;
        Predictor::new(model)
            .with_time_column(&self.config.data.time_column)
            .predict(upload)
    }

    fn fingerprint(&self, data: &AssembledData) -> Result<u64> {
        let mut hasher = DefaultHasher::new();
        data.feature_names.hash(&mut hasher);
        data.target_name.hash(&mut hasher);
        data.periods.hash(&mut hasher);
        for row in &data.features {
            for value in row {
                value.to_bits().hash(&mut hasher);
            }
        }
        for value in &data.target {
            value.to_bits().hash(&mut hasher);
        }
        self.config.model.hash(&mut hasher);
        serde_json::to_string(&self.config.evaluation)?.hash(&mut hasher);
        Ok(hasher.finish())
    }
}
