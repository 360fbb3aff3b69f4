//! CSV and JSON export of results

use crate::error::Result;
use crate::inference::PredictionResult;
use crate::trainer::{EvaluationRow, FeatureImportance, TrainedModel};
use crate::data::PERIOD_FORMAT;
use macro_math::RegressionMetrics;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write held-out predictions next to the true values
pub fn write_evaluation<W: Write>(writer: W, rows: &[EvaluationRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["period", "Model Prediction", "True Values"])?;
    for row in rows {
        wtr.write_record(&[
            row.period.format(PERIOD_FORMAT).to_string(),
            row.predicted.to_string(),
            row.actual.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write predictions for an uploaded table
pub fn write_predictions<W: Write>(writer: W, result: &PredictionResult) -> Result<()> {
    let with_actual = result.predictions.iter().any(|p| p.actual.is_some());
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![result.id_column.as_str(), "Predicted Inflation"];
    if with_actual {
        header.push("True Values");
    }
    wtr.write_record(&header)?;

    for prediction in &result.predictions {
        let mut record = vec![prediction.id.clone(), prediction.predicted.to_string()];
        if with_actual {
            record.push(prediction.actual.map(|v| v.to_string()).unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a ranked importance table
pub fn write_importances<W: Write>(writer: W, importances: &[FeatureImportance]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Feature", "Importance"])?;
    for entry in importances {
        wtr.write_record(&[entry.feature.clone(), entry.importance.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the held-out predictor rows under their feature names
pub fn write_test_features<W: Write>(writer: W, model: &TrainedModel) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&model.feature_names)?;
    for row in &model.test_features {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the held-out target values
pub fn write_test_target<W: Write>(writer: W, model: &TrainedModel) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([model.target_name.as_str()])?;
    for row in &model.evaluation {
        wtr.write_record([row.actual.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write metrics as pretty JSON
pub fn write_metrics<W: Write>(writer: W, metrics: &RegressionMetrics) -> Result<()> {
    serde_json::to_writer_pretty(writer, metrics)?;
    Ok(())
}

/// Create `path` and hand it to a writer function
pub fn to_file<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(File) -> Result<()>,
{
    write(File::create(path)?)
}
