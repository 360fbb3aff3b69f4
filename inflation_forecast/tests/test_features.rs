use chrono::NaiveDate;
use inflation_forecast::config::FeatureConfig;
use inflation_forecast::data::MacroFrame;
use inflation_forecast::error::InflationError;
use inflation_forecast::features::{DerivedFeature, FeatureAssembler, TargetVariant};
use pretty_assertions::assert_eq;

fn monthly(n: usize) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| NaiveDate::from_ymd_opt(2019 + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap())
        .collect()
}

fn sample_frame() -> MacroFrame {
    MacroFrame::from_columns(
        "period",
        monthly(6),
        vec![
            (
                "allItemsYearOn".to_string(),
                vec![Some(11.4), Some(11.3), None, Some(11.6), Some(11.7), Some(11.9)],
            ),
            (
                "foodYearOn".to_string(),
                vec![Some(13.5), Some(13.7), Some(13.8), Some(14.0), Some(14.1), Some(14.3)],
            ),
            (
                "moneySupply_M3".to_string(),
                vec![Some(35.0), Some(35.5), Some(36.1), None, Some(36.9), Some(37.3)],
            ),
            (
                "mpr".to_string(),
                vec![Some(13.5), Some(13.5), Some(13.5), Some(13.5), Some(13.0), Some(13.0)],
            ),
        ],
    )
    .unwrap()
}

#[test]
fn test_default_predictors_exclude_inflation_columns() {
    let assembler = FeatureAssembler::new(FeatureConfig::default());
    let data = assembler.assemble(&sample_frame()).unwrap();

    assert_eq!(data.target_name, "allItemsYearOn");
    assert_eq!(data.feature_names, vec!["moneySupply_M3", "mpr"]);
    // rows 3 (missing target) and 4 (missing M3) are dropped
    assert_eq!(data.n_samples(), 4);
    assert_eq!(data.dropped_rows, 2);
    assert_eq!(data.features.len(), data.target.len());
    assert!(data.features.iter().flatten().all(|v| v.is_finite()));
    assert_eq!(data.target, vec![11.4, 11.3, 11.7, 11.9]);
}

#[test]
fn test_food_target_and_exclusions() {
    let config = FeatureConfig {
        target: TargetVariant::Food,
        exclude: vec!["mpr".to_string()],
        ..FeatureConfig::default()
    };
    let data = FeatureAssembler::new(config).assemble(&sample_frame()).unwrap();

    assert_eq!(data.target_name, "foodYearOn");
    assert_eq!(data.feature_names, vec!["moneySupply_M3"]);
    assert_eq!(data.n_samples(), 5);
}

#[test]
fn test_lagged_predictor() {
    let config = FeatureConfig {
        predictors: Some(vec!["mpr".to_string()]),
        derived: vec![DerivedFeature::Lag {
            column: "mpr".to_string(),
            periods: 1,
        }],
        ..FeatureConfig::default()
    };
    let data = FeatureAssembler::new(config).assemble(&sample_frame()).unwrap();

    assert_eq!(data.feature_names, vec!["mpr", "mpr_lag1"]);
    // first row has no lag, third row has no target
    assert_eq!(data.n_samples(), 4);
    assert_eq!(data.features[0], vec![13.5, 13.5]);
    assert_eq!(data.features[2], vec![13.0, 13.5]);
}

#[test]
fn test_missing_target_column() {
    let config = FeatureConfig {
        target: TargetVariant::Core,
        ..FeatureConfig::default()
    };
    let result = FeatureAssembler::new(config).assemble(&sample_frame());
    assert!(matches!(result, Err(InflationError::Validation(_))));
}

#[test]
fn test_unknown_predictor() {
    let config = FeatureConfig {
        predictors: Some(vec!["exchange_rate".to_string()]),
        ..FeatureConfig::default()
    };
    let result = FeatureAssembler::new(config).assemble(&sample_frame());
    match result {
        Err(InflationError::Validation(msg)) => assert!(msg.contains("exchange_rate")),
        other => panic!("Expected Validation error, got {:?}", other),
    }
}
