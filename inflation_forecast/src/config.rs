//! Pipeline configuration
//!
//! Every section has defaults, so a configuration file only needs to list its
//! data sources.

use crate::data::{Frequency, JoinKind};
use crate::error::{InflationError, Result};
use crate::features::{DerivedFeature, TargetVariant};
use crate::models::ForestConfig;
use crate::utils::Holdout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One CSV source table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Label used in messages, e.g. "crude oil"
    pub name: String,
    /// Path to the CSV file
    pub path: PathBuf,
    /// Time column; detected from the header when absent
    #[serde(default)]
    pub time_column: Option<String>,
    /// Value columns to keep; all non-time columns when absent
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    /// Renames applied after selection, `source name -> merged name`
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
}

impl SourceConfig {
    /// Source with detected time column and every value column
    pub fn new(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            time_column: None,
            columns: None,
            rename: BTreeMap::new(),
        }
    }

    /// Set the time column
    pub fn with_time_column(mut self, column: &str) -> Self {
        self.time_column = Some(column.to_string());
        self
    }

    /// Restrict the value columns
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }
}

/// Data Loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Source tables, merged in order
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    /// How periods present in only some sources are handled
    #[serde(default)]
    pub join: JoinKind,
    /// Period granularity used to align sources
    #[serde(default)]
    pub frequency: Frequency,
    /// Name of the merged time column
    #[serde(default = "default_time_column")]
    pub time_column: String,
    /// Columns that must never hold negative values
    #[serde(default)]
    pub non_negative: Vec<String>,
}

fn default_time_column() -> String {
    "period".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            join: JoinKind::default(),
            frequency: Frequency::default(),
            time_column: default_time_column(),
            non_negative: Vec::new(),
        }
    }
}

/// Feature/Target Assembler configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Target column
    #[serde(default)]
    pub target: TargetVariant,
    /// Predictor columns; every numeric non-inflation column when absent
    #[serde(default)]
    pub predictors: Option<Vec<String>>,
    /// Columns never used as predictors
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Lagged and derived predictors
    #[serde(default)]
    pub derived: Vec<DerivedFeature>,
}

/// Hold-out evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Train/evaluation split
    #[serde(default)]
    pub holdout: Holdout,
    /// Compute RMSLE; requires strictly positive targets
    #[serde(default = "default_true")]
    pub rmsle: bool,
    /// Number of ranked features kept for presentation
    #[serde(default = "default_top_features")]
    pub top_features: usize,
}

fn default_true() -> bool {
    true
}

fn default_top_features() -> usize {
    15
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            holdout: Holdout::default(),
            rmsle: true,
            top_features: default_top_features(),
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub model: ForestConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    ///
    /// Relative source paths are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            InflationError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Make relative source paths relative to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for source in &mut self.data.sources {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
    }

    /// Check option ranges
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.evaluation.holdout.validate()?;
        if self.evaluation.top_features == 0 {
            return Err(InflationError::InvalidParameter(
                "top_features must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
