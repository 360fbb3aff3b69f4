//! Predictions on uploaded tables

use crate::data::{parse_period, DataLoader, PERIOD_FORMAT};
use crate::error::{InflationError, Result};
use crate::trainer::TrainedModel;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Prediction for one uploaded row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Period from the upload's time column, or the 1-based row number
    pub id: String,
    pub predicted: f64,
    /// Target value when the upload carries the target column
    pub actual: Option<f64>,
}

/// Predictions for a whole upload, in input row order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Heading of the identifier column
    pub id_column: String,
    pub predictions: Vec<Prediction>,
}

impl PredictionResult {
    /// Number of predictions
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    /// Whether there are no predictions
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Predicted values only
    pub fn values(&self) -> Vec<f64> {
        self.predictions.iter().map(|p| p.predicted).collect()
    }
}

/// Applies a trained model to new data
#[derive(Debug)]
pub struct Predictor<'a> {
    model: &'a TrainedModel,
    time_column: Option<String>,
}

impl<'a> Predictor<'a> {
    /// Create a predictor for a trained model
    pub fn new(model: &'a TrainedModel) -> Self {
        Self {
            model,
            time_column: None,
        }
    }

    /// Use a named column as row identifier when present
    pub fn with_time_column(mut self, column: &str) -> Self {
        self.time_column = Some(column.to_string());
        self
    }

    /// Predict every row of an uploaded table
    pub fn predict(&self, df: &DataFrame) -> Result<PredictionResult> {
        if df.height() == 0 {
            return Err(InflationError::DataLoad("uploaded file has no rows".to_string()));
        }

        // Upload headers match exactly first, then case-insensitively
        let mut columns = Vec::with_capacity(self.model.feature_names.len());
        let mut missing = Vec::new();
        for feature in &self.model.feature_names {
            match DataLoader::find_column(df, feature) {
                Some(column) => columns.push(column),
                None => missing.push(feature.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(InflationError::SchemaMismatch { missing });
        }

        let mut rows = vec![Vec::with_capacity(columns.len()); df.height()];
        for column in &columns {
            let values = DataLoader::numeric_values(df.column(column)?, "uploaded file")?;
            for (i, value) in values.into_iter().enumerate() {
                let value = value.ok_or_else(|| {
                    InflationError::DataLoad(format!(
                        "uploaded file: missing value in column '{}' at row {}",
                        column,
                        i + 1
                    ))
                })?;
                rows[i].push(value);
            }
        }

        let (id_column, ids) = self.identifiers(df)?;
        let actual = self.actual_values(df)?;

        let predictions: Vec<Prediction> = self
            .model
            .predict_rows(&rows)
            .into_iter()
            .zip(ids)
            .zip(actual)
            .map(|((predicted, id), actual)| Prediction {
                id,
                predicted,
                actual,
            })
            .collect();

        info!(rows = predictions.len(), "predicted uploaded rows");
        Ok(PredictionResult {
            id_column,
            predictions,
        })
    }

    /// Target values carried by the upload; cells that don't parse become `None`
    fn actual_values(&self, df: &DataFrame) -> Result<Vec<Option<f64>>> {
        let column = match DataLoader::find_column(df, &self.model.target_name) {
            Some(column) => column,
            None => return Ok(vec![None; df.height()]),
        };
        let series = df.column(&column)?;
        match DataLoader::numeric_values(series, "uploaded file") {
            Ok(values) => Ok(values),
            Err(err) => {
                warn!(column = %column, "ignoring unparseable target values: {}", err);
                let cast = series.cast(&DataType::Float64)?;
                let values = cast
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| x.is_finite()))
                    .collect();
                Ok(values)
            }
        }
    }

    /// Row identifiers: the time column, else a date-like column, else row numbers
    fn identifiers(&self, df: &DataFrame) -> Result<(String, Vec<String>)> {
        let column = self
            .time_column
            .as_deref()
            .and_then(|name| DataLoader::find_column(df, name))
            .or_else(|| {
                df.get_column_names()
                    .into_iter()
                    .find(|n| {
                        let lower = n.to_lowercase();
                        lower.contains("date") || lower.contains("period")
                    })
                    .map(|n| n.to_string())
            });

        if let Some(column) = column {
            let series = df.column(&column)?.cast(&DataType::Utf8)?;
            let ids = series
                .utf8()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| match v.and_then(parse_period) {
                    Some(date) => date.format(PERIOD_FORMAT).to_string(),
                    None => v.map(|s| s.to_string()).unwrap_or_else(|| (i + 1).to_string()),
                })
                .collect();
            return Ok((column, ids));
        }

        Ok((
            "row".to_string(),
            (1..=df.height()).map(|i| i.to_string()).collect(),
        ))
    }
}
