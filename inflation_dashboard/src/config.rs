//! Dashboard configuration
//!
//! The pipeline sections (`data`, `features`, `model`, `evaluation`) are the
//! ones `inflation_forecast` reads; `charts` and `report` only affect output.

use crate::charts::ChartConfig;
use crate::error::{DashboardError, Result};
use inflation_forecast::features::{CORE_INFLATION, FOOD_INFLATION, HEADLINE_INFLATION};
use inflation_forecast::{DataConfig, EvaluationConfig, FeatureConfig, ForestConfig, PipelineConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Chart selection and layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Canvas size
    pub size: ChartConfig,
    /// Bins per distribution histogram
    pub histogram_bins: usize,
    /// Columns drawn on the trend chart
    pub trend_columns: Vec<String>,
    /// Columns of the correlation heatmap
    pub correlation_columns: Vec<String>,
    /// Columns with a distribution chart
    pub distribution_columns: Vec<String>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            size: ChartConfig::default(),
            histogram_bins: 30,
            trend_columns: vec![
                HEADLINE_INFLATION.to_string(),
                FOOD_INFLATION.to_string(),
                CORE_INFLATION.to_string(),
            ],
            correlation_columns: vec![
                HEADLINE_INFLATION.to_string(),
                "moneySupply_M3".to_string(),
                "moneySupply_M2".to_string(),
                "narrowMoney".to_string(),
            ],
            distribution_columns: vec![HEADLINE_INFLATION.to_string(), "moneySupply_M3".to_string()],
        }
    }
}

/// Report text options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
    /// Rows shown in table previews
    pub preview_rows: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "Inflation Inference Dashboard".to_string(),
            preview_rows: 5,
        }
    }
}

/// Full dashboard configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub model: ForestConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub charts: ChartSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    ///
    /// Relative source paths are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            for source in &mut config.data.sources {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.pipeline().validate()?;
        if config.charts.histogram_bins == 0 {
            return Err(DashboardError::Config(
                "histogram_bins must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// The sections the pipeline reads
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            data: self.data.clone(),
            features: self.features.clone(),
            model: self.model.clone(),
            evaluation: self.evaluation.clone(),
        }
    }
}
