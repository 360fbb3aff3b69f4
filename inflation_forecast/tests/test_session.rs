use chrono::NaiveDate;
use inflation_forecast::config::{PipelineConfig, SourceConfig};
use inflation_forecast::data::{DataLoader, MacroFrame};
use inflation_forecast::error::InflationError;
use inflation_forecast::models::ForestConfig;
use inflation_forecast::session::Session;
use std::fs;
use tempfile::TempDir;

fn frame() -> MacroFrame {
    let n = 36;
    let periods: Vec<NaiveDate> = (0..n)
        .map(|i| NaiveDate::from_ymd_opt(2020 + i / 12, (i % 12) as u32 + 1, 1).unwrap())
        .collect();
    MacroFrame::from_columns(
        "period",
        periods,
        vec![
            (
                "allItemsYearOn".to_string(),
                (0..n).map(|i| Some(12.0 + 0.3 * i as f64)).collect(),
            ),
            (
                "moneySupply_M3".to_string(),
                (0..n).map(|i| Some(40.0 + i as f64)).collect(),
            ),
        ],
    )
    .unwrap()
}

fn config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.model.n_trees = 10;
    config
}

#[test]
fn test_predict_before_training_fails() {
    let session = Session::with_frame(config(), frame());
    let upload = DataLoader::read_upload_bytes(b"moneySupply_M3\n50.0\n").unwrap();

    assert!(matches!(
        session.predict_upload(&upload),
        Err(InflationError::ModelNotTrained)
    ));
    assert!(matches!(
        session.trained_model(),
        Err(InflationError::ModelNotTrained)
    ));
}

#[test]
fn test_model_is_cached_until_inputs_change() {
    let mut session = Session::with_frame(config(), frame());

    let first_r2 = session.model().unwrap().metrics.r2;
    session.model().unwrap();
    assert_eq!(session.trainings(), 1);

    session.set_model(ForestConfig {
        n_trees: 5,
        ..ForestConfig::default()
    });
    assert!(session.trained_model().is_err());
    session.model().unwrap();
    assert_eq!(session.trainings(), 2);

    // same inputs again after an explicit invalidation
    session.invalidate();
    let model = session.model().unwrap();
    assert_eq!(model.forest.n_trees(), 5);
    assert_eq!(session.trainings(), 3);
    assert!(first_r2.is_finite());
}

#[test]
fn test_predict_upload_after_training() {
    let mut session = Session::with_frame(config(), frame());
    session.model().unwrap();

    let upload = DataLoader::read_upload_bytes(b"period,moneySupply_M3\n2023-01-01,76.0\n2023-02-01,77.0\n").unwrap();
    let result = session.predict_upload(&upload).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.id_column, "period");
    assert_eq!(result.predictions[1].id, "2023-02-01");
}

#[test]
fn test_upload_without_time_column_uses_date_column() {
    let mut session = Session::with_frame(config(), frame());
    session.model().unwrap();

    let upload = DataLoader::read_upload_bytes(b"date,moneySupply_M3\n2024-01-01,50.0\n").unwrap();
    let result = session.predict_upload(&upload).unwrap();

    assert_eq!(result.id_column, "date");
    assert_eq!(result.predictions[0].id, "2024-01-01");
}

#[test]
fn test_session_loads_configured_sources() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("date,allItemsYearOn,moneySupply_M3\n");
    for i in 0..24 {
        csv.push_str(&format!(
            "{}-{:02},{},{}\n",
            2021 + i / 12,
            i % 12 + 1,
            15.0 + i as f64,
            50 + i
        ));
    }
    fs::write(dir.path().join("macro.csv"), csv).unwrap();

    let mut config = config();
    config.data.sources = vec![SourceConfig::new("macro", "macro.csv")];
    config.resolve_paths(dir.path());

    let mut session = Session::new(config);
    assert!(session.frame().is_none());
    assert_eq!(session.load().unwrap().height(), 24);

    let model = session.model().unwrap();
    assert_eq!(model.test_rows, 5);

    session.reload();
    assert!(session.frame().is_none());
    assert!(session.trained_model().is_err());
}
