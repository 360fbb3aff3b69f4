use chrono::NaiveDate;
use inflation_dashboard::report::{
    EVALUATION_FILE, IMPORTANCE_FILE, MERGED_DATA_FILE, REPORT_FILE, USER_PREDICTIONS_FILE,
};
use inflation_dashboard::{Dashboard, DashboardConfig, Stage};
use inflation_forecast::MacroFrame;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn frame(with_target: bool) -> MacroFrame {
    let n = 48;
    let periods: Vec<NaiveDate> = (0..n)
        .map(|i| NaiveDate::from_ymd_opt(2019 + i / 12, (i % 12) as u32 + 1, 1).unwrap())
        .collect();
    let series = |f: &dyn Fn(f64) -> f64| -> Vec<Option<f64>> {
        (0..n).map(|i| Some(f(i as f64))).collect()
    };

    let mut columns = vec![
        ("foodYearOn".to_string(), series(&|t| 14.0 + 0.4 * t + (t * 0.7).sin())),
        (
            "allItemsLessFrmProdAndEnergyYearOn".to_string(),
            series(&|t| 9.0 + 0.2 * t + (t * 0.3).cos()),
        ),
        ("moneySupply_M3".to_string(), series(&|t| 40000.0 + 600.0 * t + 150.0 * (t * 0.5).sin())),
        ("moneySupply_M2".to_string(), series(&|t| 35000.0 + 520.0 * t + 90.0 * (t * 0.9).cos())),
        ("narrowMoney".to_string(), series(&|t| 12000.0 + 180.0 * t + 40.0 * (t * 1.3).sin())),
        ("mpr".to_string(), series(&|t| if t < 24.0 { 13.5 } else { 11.5 + 0.25 * (t - 24.0) })),
    ];
    if with_target {
        columns.insert(
            0,
            (
                "allItemsYearOn".to_string(),
                series(&|t| 11.0 + 0.3 * t + 0.5 * (t * 0.6).sin()),
            ),
        );
    }
    MacroFrame::from_columns("period", periods, columns).unwrap()
}

fn config() -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.model.n_trees = 12;
    config.charts.size.width = 320;
    config.charts.size.height = 200;
    config.charts.histogram_bins = 10;
    config
}

fn write_upload(dir: &Path, header: &str, rows: &[&str]) -> std::path::PathBuf {
    let path = dir.join("upload.csv");
    let mut text = format!("{}\n", header);
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_full_report_writes_every_download() {
    let dir = TempDir::new().unwrap();
    let upload = write_upload(
        dir.path(),
        "period,moneySupply_M3,moneySupply_M2,narrowMoney,mpr",
        &[
            "2023-01-01,69000,60000,20700,18.0",
            "2023-02-01,69500,60400,20900,18.0",
            "2023-03-01,70100,60900,21000,18.5",
        ],
    );
    let out = dir.path().join("report");

    let mut dashboard = Dashboard::with_frame(config(), frame(true));
    let summary = dashboard.render(&out, Some(&upload)).unwrap();

    assert!(summary.notices.is_empty(), "{:?}", summary.notices);
    assert!(summary.trained);
    for file in [
        MERGED_DATA_FILE,
        EVALUATION_FILE,
        IMPORTANCE_FILE,
        USER_PREDICTIONS_FILE,
        REPORT_FILE,
        "x_test.csv",
        "y_test.csv",
        "metrics.json",
        "inflation_trend.png",
        "correlation_heatmap.png",
        "distribution_allItemsYearOn.png",
        "distribution_moneySupply_M3.png",
        "feature_importance.png",
    ] {
        assert!(out.join(file).is_file(), "missing {}", file);
        assert!(summary.files.contains(&out.join(file)), "not listed: {}", file);
    }

    let page = fs::read_to_string(out.join(REPORT_FILE)).unwrap();
    for section in [
        "# Inflation Inference Dashboard",
        "## Data Dictionary",
        "## Exploratory Data Analysis",
        "### Inflation Trends Over Time (YoY %)",
        "## Inflation Prediction Model",
        "| R² |",
        "| Period | Model Prediction | True Values |",
        "## Predictions for the Uploaded File",
        "![Correlation Between Inflation and Money Supply](correlation_heatmap.png)",
    ] {
        assert!(page.contains(section), "missing section {}", section);
    }
    assert!(!page.contains("## Notices"));

    let predictions = fs::read_to_string(out.join(USER_PREDICTIONS_FILE)).unwrap();
    let mut lines = predictions.lines();
    assert_eq!(lines.next(), Some("period,Predicted Inflation"));
    assert_eq!(lines.count(), 3);
}

#[test]
fn test_missing_target_becomes_notice() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report");

    let mut dashboard = Dashboard::with_frame(config(), frame(false));
    let summary = dashboard.render(&out, None).unwrap();

    assert!(!summary.trained);
    assert!(summary.notices.iter().any(|n| n.stage == Stage::Train));
    assert!(out.join(MERGED_DATA_FILE).is_file());
    assert!(!out.join(EVALUATION_FILE).exists());

    let page = fs::read_to_string(out.join(REPORT_FILE)).unwrap();
    assert!(page.contains("## Notices"));
    assert!(page.contains("**model training**"));
    assert!(!page.contains("## Inflation Prediction Model"));
}

#[rstest]
#[case("period,moneySupply_M3,mpr", "2023-01-01,69000,18.0", "SchemaMismatchError")]
#[case("period,moneySupply_M3,moneySupply_M2,narrowMoney,mpr", "2023-01-01,69000,60000,,18.0", "DataLoadError")]
fn test_bad_upload_becomes_notice(#[case] header: &str, #[case] row: &str, #[case] kind: &str) {
    let dir = TempDir::new().unwrap();
    let upload = write_upload(dir.path(), header, &[row]);
    let out = dir.path().join("report");

    let mut dashboard = Dashboard::with_frame(config(), frame(true));
    let summary = dashboard.render(&out, Some(&upload)).unwrap();

    assert!(summary.trained);
    assert_eq!(summary.notices.len(), 1);
    assert_eq!(summary.notices[0].stage, Stage::Upload);
    assert_eq!(summary.notices[0].kind, kind);
    assert!(!out.join(USER_PREDICTIONS_FILE).exists());
    assert!(out.join(REPORT_FILE).is_file());
}

#[test]
fn test_missing_sources_still_write_report() {
    let dir = TempDir::new().unwrap();
    let toml = format!(
        "[[data.sources]]\nname = \"cpi\"\npath = \"{}\"\n",
        dir.path().join("absent.csv").display()
    );
    let config = DashboardConfig::from_toml_str(&toml).unwrap();
    let out = dir.path().join("report");

    let mut dashboard = Dashboard::new(config);
    let summary = dashboard.render(&out, None).unwrap();

    assert!(!summary.trained);
    assert_eq!(summary.notices.len(), 1);
    assert_eq!(summary.notices[0].stage, Stage::Load);
    assert_eq!(summary.files, vec![out.join(REPORT_FILE)]);
}

#[test]
fn test_upload_without_model_reports_not_trained() {
    let dir = TempDir::new().unwrap();
    let upload = write_upload(dir.path(), "moneySupply_M3", &["69000"]);

    let dashboard = Dashboard::with_frame(config(), frame(true));
    let err = dashboard.predict_upload(&upload, dir.path()).unwrap_err();
    assert_eq!(err.kind(), "ModelNotTrainedError");
}

#[test]
fn test_config_file_resolves_relative_sources() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("dashboard.toml"),
        "[[data.sources]]\nname = \"cpi\"\npath = \"data/cpi.csv\"\n\n[report]\ntitle = \"CPI\"\n",
    )
    .unwrap();

    let config = DashboardConfig::load(dir.path().join("dashboard.toml")).unwrap();
    assert_eq!(config.data.sources[0].path, dir.path().join("data/cpi.csv"));
    assert_eq!(config.report.title, "CPI");
    assert_eq!(config.report.preview_rows, 5);
}

#[test]
fn test_shipped_configuration_renders() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let mut config = DashboardConfig::load(root.join("config/dashboard.toml")).unwrap();
    config.model.n_trees = 20;
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report");

    let mut dashboard = Dashboard::new(config);
    let summary = dashboard
        .render(&out, Some(&root.join("data/upload_sample.csv")))
        .unwrap();

    assert!(summary.notices.is_empty(), "{:?}", summary.notices);
    let frame = dashboard.session().frame().unwrap();
    assert_eq!(frame.height(), 60);
    assert!(frame.has_column("oil_price"));

    let predictions = fs::read_to_string(out.join(USER_PREDICTIONS_FILE)).unwrap();
    assert!(predictions.lines().nth(1).unwrap().starts_with("2024-01-01,"));
}
