//! Feature/Target assembly
//!
//! Selects predictor columns and the target from a merged frame, adds lagged
//! and derived predictors, and drops incomplete rows. Missing values are never
//! imputed.

use crate::config::FeatureConfig;
use crate::data::MacroFrame;
use crate::error::{InflationError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Headline inflation, YoY % change in CPI for all items
pub const HEADLINE_INFLATION: &str = "allItemsYearOn";
/// Food inflation, YoY % change in the food CPI
pub const FOOD_INFLATION: &str = "foodYearOn";
/// Core inflation, excluding farm produce and energy
pub const CORE_INFLATION: &str = "allItemsLessFrmProdAndEnergyYearOn";

/// Which inflation measure is predicted
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetVariant {
    #[default]
    Headline,
    Food,
    Core,
    /// Any named column
    Column(String),
}

impl TargetVariant {
    /// Column name of the target
    pub fn column(&self) -> &str {
        match self {
            TargetVariant::Headline => HEADLINE_INFLATION,
            TargetVariant::Food => FOOD_INFLATION,
            TargetVariant::Core => CORE_INFLATION,
            TargetVariant::Column(name) => name,
        }
    }
}

/// A predictor computed from another column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedFeature {
    /// Value `periods` rows earlier
    Lag { column: String, periods: usize },
    /// Percent change over `periods` rows
    PctChange { column: String, periods: usize },
}

impl DerivedFeature {
    /// Name of the generated column
    pub fn name(&self) -> String {
        match self {
            DerivedFeature::Lag { column, periods } => format!("{}_lag{}", column, periods),
            DerivedFeature::PctChange { column, periods } => format!("{}_pct{}", column, periods),
        }
    }

    /// Source column
    pub fn source(&self) -> &str {
        match self {
            DerivedFeature::Lag { column, .. } | DerivedFeature::PctChange { column, .. } => column,
        }
    }

    /// Compute the derived values from the source values
    pub fn compute(&self, values: &[Option<f64>]) -> Result<Vec<Option<f64>>> {
        let periods = match self {
            DerivedFeature::Lag { periods, .. } | DerivedFeature::PctChange { periods, .. } => {
                *periods
            }
        };
        if periods == 0 {
            return Err(InflationError::InvalidParameter(format!(
                "derived feature '{}' needs periods > 0",
                self.name()
            )));
        }

        Ok((0..values.len())
            .map(|i| {
                let previous = i.checked_sub(periods).and_then(|j| values[j]);
                match self {
                    DerivedFeature::Lag { .. } => previous,
                    DerivedFeature::PctChange { .. } => {
                        let (now, before) = (values[i]?, previous?);
                        if before == 0.0 {
                            None
                        } else {
                            Some((now - before) / before.abs() * 100.0)
                        }
                    }
                }
            })
            .collect())
    }
}

/// Aligned predictor matrix and target vector
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledData {
    /// Predictor names, in column order of `features`
    pub feature_names: Vec<String>,
    /// Target column name
    pub target_name: String,
    /// Row-major predictor values
    pub features: Vec<Vec<f64>>,
    /// Target values
    pub target: Vec<f64>,
    /// Period of each row
    pub periods: Vec<NaiveDate>,
    /// Rows removed for missing values
    pub dropped_rows: usize,
}

impl AssembledData {
    /// Number of samples
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Number of features
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Rows `start..end` as a new dataset
    pub fn rows(&self, start: usize, end: usize) -> AssembledData {
        self.subset(&(start..end).collect::<Vec<_>>())
    }

    /// Create a subset by row indices
    pub fn subset(&self, indices: &[usize]) -> AssembledData {
        AssembledData {
            feature_names: self.feature_names.clone(),
            target_name: self.target_name.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            target: indices.iter().map(|&i| self.target[i]).collect(),
            periods: indices.iter().map(|&i| self.periods[i]).collect(),
            dropped_rows: 0,
        }
    }
}

/// Selects predictors and target from a merged frame
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    config: FeatureConfig,
}

impl FeatureAssembler {
    /// Create an assembler
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Target column name
    pub fn target(&self) -> &str {
        self.config.target.column()
    }

    /// Frame with the configured derived columns appended
    pub fn with_derived(&self, frame: &MacroFrame) -> Result<MacroFrame> {
        let mut frame = frame.clone();
        for derived in &self.config.derived {
            let source = frame.column(derived.source()).map_err(|_| {
                InflationError::Validation(format!(
                    "derived feature '{}' refers to unknown column '{}'",
                    derived.name(),
                    derived.source()
                ))
            })?;
            frame = frame.with_column(&derived.name(), derived.compute(&source)?)?;
        }
        Ok(frame)
    }

    /// Resolve the predictor column list against a frame
    pub fn predictor_names(&self, frame: &MacroFrame) -> Result<Vec<String>> {
        let target = self.target();
        let mut names: Vec<String> = match &self.config.predictors {
            Some(predictors) => {
                let missing: Vec<&String> =
                    predictors.iter().filter(|p| !frame.has_column(p)).collect();
                if !missing.is_empty() {
                    return Err(InflationError::Validation(format!(
                        "predictor column(s) not found: {}",
                        missing
                            .iter()
                            .map(|s| s.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )));
                }
                predictors.clone()
            }
            None => frame
                .column_names()
                .into_iter()
                .filter(|name| {
                    ![HEADLINE_INFLATION, FOOD_INFLATION, CORE_INFLATION].contains(&name.as_str())
                })
                .collect(),
        };

        for derived in &self.config.derived {
            let name = derived.name();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names.retain(|name| name != target && !self.config.exclude.contains(name));

        if names.is_empty() {
            return Err(InflationError::Validation(
                "at least one predictor column is required".to_string(),
            ));
        }
        Ok(names)
    }

    /// Build the predictor matrix and target vector
    pub fn assemble(&self, frame: &MacroFrame) -> Result<AssembledData> {
        let target_name = self.target().to_string();
        if !frame.has_column(&target_name) {
            return Err(InflationError::Validation(format!(
                "target column '{}' not found",
                target_name
            )));
        }

        let frame = self.with_derived(frame)?;
        let target_values = frame.column(&target_name)?;
        if target_values.iter().all(|v| v.is_none()) {
            return Err(InflationError::Validation(format!(
                "target column '{}' has no numeric values",
                target_name
            )));
        }

        let feature_names = self.predictor_names(&frame)?;
        let columns = feature_names
            .iter()
            .map(|name| frame.column(name))
            .collect::<Result<Vec<_>>>()?;

        let mut features = Vec::with_capacity(frame.height());
        let mut target = Vec::with_capacity(frame.height());
        let mut periods = Vec::with_capacity(frame.height());
        let mut dropped_rows = 0;

        for (row, period) in frame.periods().iter().enumerate() {
            let values: Option<Vec<f64>> = columns.iter().map(|c| c[row]).collect();
            match (values, target_values[row]) {
                (Some(values), Some(y)) => {
                    features.push(values);
                    target.push(y);
                    periods.push(*period);
                }
                _ => dropped_rows += 1,
            }
        }

        if dropped_rows > 0 {
            warn!(
                dropped_rows,
                kept_rows = features.len(),
                "dropped rows with missing feature or target values"
            );
        }
        if features.is_empty() {
            return Err(InflationError::Validation(
                "no complete rows remain after dropping missing values".to_string(),
            ));
        }

        info!(
            rows = features.len(),
            features = feature_names.len(),
            target = %target_name,
            "assembled training data"
        );

        Ok(AssembledData {
            feature_names,
            target_name,
            features,
            target,
            periods,
            dropped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lag_and_pct_change() {
        let values = vec![Some(100.0), Some(110.0), None, Some(121.0)];

        let lag = DerivedFeature::Lag {
            column: "m3".to_string(),
            periods: 1,
        };
        assert_eq!(lag.name(), "m3_lag1");
        assert_eq!(
            lag.compute(&values).unwrap(),
            vec![None, Some(100.0), Some(110.0), None]
        );

        let pct = DerivedFeature::PctChange {
            column: "m3".to_string(),
            periods: 1,
        };
        let changes = pct.compute(&values).unwrap();
        assert_eq!(changes[0], None);
        assert!((changes[1].unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(changes[2], None);
        assert_eq!(changes[3], None);

        let zero = DerivedFeature::Lag {
            column: "m3".to_string(),
            periods: 0,
        };
        assert!(zero.compute(&values).is_err());
    }

    #[test]
    fn target_variants() {
        assert_eq!(TargetVariant::Headline.column(), "allItemsYearOn");
        assert_eq!(TargetVariant::Food.column(), "foodYearOn");
        assert_eq!(
            TargetVariant::Core.column(),
            "allItemsLessFrmProdAndEnergyYearOn"
        );
        assert_eq!(TargetVariant::Column("x".to_string()).column(), "x");
    }
}
