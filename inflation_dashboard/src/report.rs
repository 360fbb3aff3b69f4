//! Report assembly
//!
//! Every pipeline stage runs behind a boundary: a failure becomes a
//! [`Notice`] and the stages that don't depend on it still run. The report
//! directory always receives a `dashboard.md`.

use crate::charts::{
    self, colors, render_distribution, render_heatmap, render_importance, render_trend,
    TrendSeries,
};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::markdown;
use inflation_forecast::export::{
    to_file, write_evaluation, write_importances, write_metrics, write_predictions,
    write_test_features, write_test_target,
};
use inflation_forecast::{DataLoader, MacroFrame, PredictionResult, Session, TrainedModel};
use macro_math::correlation_matrix;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Merged data download
pub const MERGED_DATA_FILE: &str = "merge_data.csv";
/// Held-out predictions download
pub const EVALUATION_FILE: &str = "inflation_predictions.csv";
/// Importance table download
pub const IMPORTANCE_FILE: &str = "feature_importances.csv";
/// Upload predictions download
pub const USER_PREDICTIONS_FILE: &str = "user_inflation_predictions.csv";
/// Report page
pub const REPORT_FILE: &str = "dashboard.md";

/// Pipeline stage a notice comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Charts,
    Train,
    Export,
    Upload,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "data loading",
            Stage::Charts => "charts",
            Stage::Train => "model training",
            Stage::Export => "downloads",
            Stage::Upload => "upload prediction",
        };
        f.write_str(name)
    }
}

/// User-facing message for a failed stage
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub stage: Stage,
    pub kind: &'static str,
    pub message: String,
}

/// A rendered chart and its legend
#[derive(Debug, Clone)]
pub struct ChartEntry {
    pub title: String,
    pub file: String,
    pub legend: String,
}

/// Everything the Markdown page shows
#[derive(Debug, Default)]
pub struct ReportContent {
    pub frame: Option<MacroFrame>,
    pub charts: Vec<ChartEntry>,
    pub model: Option<TrainedModel>,
    pub upload: Option<PredictionResult>,
    pub files: Vec<String>,
    pub notices: Vec<Notice>,
}

/// Files written and notices raised by one report run
#[derive(Debug)]
pub struct ReportSummary {
    pub out_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub notices: Vec<Notice>,
    pub trained: bool,
}

/// The dashboard for one session
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    session: Session,
}

impl Dashboard {
    /// Dashboard loading the configured sources
    pub fn new(config: DashboardConfig) -> Self {
        let session = Session::new(config.pipeline());
        Self { config, session }
    }

    /// Dashboard over an already merged frame
    pub fn with_frame(config: DashboardConfig, frame: MacroFrame) -> Self {
        let session = Session::with_frame(config.pipeline(), frame);
        Self { config, session }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Render every chart, table and the Markdown page into `out_dir`.
    ///
    /// Only failing to create the directory or to write the page is an error.
    pub fn render<P: AsRef<Path>>(&mut self, out_dir: P, upload: Option<&Path>) -> Result<ReportSummary> {
        let out = out_dir.as_ref();
        fs::create_dir_all(out)?;
        let mut content = ReportContent::default();

        let frame = self.session.load().cloned().map_err(DashboardError::from);
        content.frame = guard(&mut content.notices, Stage::Load, frame);

        if let Some(frame) = content.frame.clone() {
            let written = frame
                .write_csv(out.join(MERGED_DATA_FILE))
                .map_err(DashboardError::from);
            if guard(&mut content.notices, Stage::Export, written).is_some() {
                content.files.push(MERGED_DATA_FILE.to_string());
            }

            self.render_charts(&frame, out, &mut content);

            let model = self.session.model().cloned().map_err(DashboardError::from);
            content.model = guard(&mut content.notices, Stage::Train, model);
        }

        if let Some(model) = content.model.clone() {
            let entry = self.importance_chart(&model, out);
            if let Some(entry) = guard(&mut content.notices, Stage::Charts, entry) {
                content.files.push(entry.file.clone());
                content.charts.push(entry);
            }
            let written = write_model_tables(&model, out);
            if let Some(files) = guard(&mut content.notices, Stage::Export, written) {
                content.files.extend(files);
            }
        }

        if let Some(path) = upload {
            let predicted = self.predict_upload(path, out);
            if let Some(result) = guard(&mut content.notices, Stage::Upload, predicted) {
                content.files.push(USER_PREDICTIONS_FILE.to_string());
                content.upload = Some(result);
            }
        }

        let page = markdown::render(&self.config, &content)?;
        fs::write(out.join(REPORT_FILE), page)?;

        info!(
            out_dir = %out.display(),
            files = content.files.len(),
            notices = content.notices.len(),
            "wrote dashboard report"
        );

        let mut files: Vec<PathBuf> = content.files.iter().map(|f| out.join(f)).collect();
        files.push(out.join(REPORT_FILE));
        Ok(ReportSummary {
            out_dir: out.to_path_buf(),
            files,
            trained: content.model.is_some(),
            notices: content.notices,
        })
    }

    /// Predict an uploaded CSV and write the predictions next to the report
    pub fn predict_upload(&self, upload: &Path, out_dir: &Path) -> Result<PredictionResult> {
        let df = DataLoader::read_upload(upload)?;
        let result = self.session.predict_upload(&df)?;
        to_file(out_dir.join(USER_PREDICTIONS_FILE), |f| write_predictions(f, &result))?;
        Ok(result)
    }

    fn render_charts(&self, frame: &MacroFrame, out: &Path, content: &mut ReportContent) {
        let mut entries = vec![
            self.trend_chart(frame, out),
            self.correlation_chart(frame, out),
        ];
        let fills = [colors::SKY_BLUE, colors::LIGHT_GREEN];
        for (i, column) in self.config.charts.distribution_columns.iter().enumerate() {
            entries.push(self.distribution_chart(frame, column, fills[i % fills.len()], out));
        }

        for entry in entries {
            if let Some(entry) = guard(&mut content.notices, Stage::Charts, entry) {
                content.files.push(entry.file.clone());
                content.charts.push(entry);
            }
        }
    }

    fn trend_chart(&self, frame: &MacroFrame, out: &Path) -> Result<ChartEntry> {
        let series: Vec<TrendSeries> = self
            .config
            .charts
            .trend_columns
            .iter()
            .filter(|c| frame.has_column(c))
            .enumerate()
            .map(|(i, column)| -> Result<TrendSeries> {
                Ok(TrendSeries {
                    label: column.clone(),
                    values: frame.column(column)?,
                    color: colors::SERIES[i % colors::SERIES.len()],
                })
            })
            .collect::<Result<_>>()?;
        if series.is_empty() {
            return Err(DashboardError::Chart(format!(
                "none of the trend columns ({}) are in the merged data",
                self.config.charts.trend_columns.join(", ")
            )));
        }

        let (img, range) = render_trend(&series, &self.config.charts.size)?;
        let file = "inflation_trend.png".to_string();
        charts::save_png(&img, out.join(&file))?;

        let periods = frame.periods();
        let mut legend = format!(
            "Period {} to {} on the horizontal axis, YoY % from {:.2} to {:.2} on the vertical axis.\n\n",
            periods.first().map(|p| p.to_string()).unwrap_or_default(),
            periods.last().map(|p| p.to_string()).unwrap_or_default(),
            range.min,
            range.max
        );
        for s in &series {
            legend.push_str(&format!("- {}: `{}`\n", colors::name(s.color), s.label));
        }

        Ok(ChartEntry {
            title: "Inflation Trends Over Time (YoY %)".to_string(),
            file,
            legend,
        })
    }

    fn correlation_chart(&self, frame: &MacroFrame, out: &Path) -> Result<ChartEntry> {
        let columns: Vec<(String, Vec<Option<f64>>)> = self
            .config
            .charts
            .correlation_columns
            .iter()
            .filter(|c| frame.has_column(c))
            .map(|c| -> Result<(String, Vec<Option<f64>>)> { Ok((c.clone(), frame.column(c)?)) })
            .collect::<Result<_>>()?;
        if columns.len() < 2 {
            return Err(DashboardError::Chart(
                "the correlation heatmap needs at least two of its columns in the merged data"
                    .to_string(),
            ));
        }

        let matrix = correlation_matrix(&columns)?;
        let img = render_heatmap(&matrix, &self.config.charts.size);
        let file = "correlation_heatmap.png".to_string();
        charts::save_png(&img, out.join(&file))?;

        Ok(ChartEntry {
            title: "Correlation Between Inflation and Money Supply".to_string(),
            file,
            legend: markdown::correlation_table(&matrix)?,
        })
    }

    fn distribution_chart(
        &self,
        frame: &MacroFrame,
        column: &str,
        color: image::Rgb<u8>,
        out: &Path,
    ) -> Result<ChartEntry> {
        let values = frame.column_values(column)?;
        let (img, dist) = render_distribution(
            &values,
            self.config.charts.histogram_bins,
            color,
            &self.config.charts.size,
        )?;
        let file = format!("distribution_{}.png", column);
        charts::save_png(&img, out.join(&file))?;

        let hist = &dist.histogram;
        let mut legend = format!(
            "{} {} bars over {:.2} to {:.2} (bin width {:.3}), tallest bin {} rows.",
            hist.counts.len(),
            colors::name(color),
            hist.edges[0],
            hist.edges[hist.edges.len() - 1],
            hist.bin_width(),
            hist.max_count()
        );
        if dist.with_kde {
            legend.push_str(" Navy curve: kernel density estimate scaled to counts.");
        }

        Ok(ChartEntry {
            title: format!("Distribution of {}", column),
            file,
            legend,
        })
    }

    fn importance_chart(&self, model: &TrainedModel, out: &Path) -> Result<ChartEntry> {
        let img = render_importance(&model.top_features, &self.config.charts.size)?;
        let file = "feature_importance.png".to_string();
        charts::save_png(&img, out.join(&file))?;

        let legend = format!(
            "Bars from top to bottom follow the ranking table below; colors run along the viridis scale. The longest bar is {:.4}.",
            model.top_features.first().map(|f| f.importance).unwrap_or(0.0)
        );
        Ok(ChartEntry {
            title: format!("Top {} Feature Importances", model.top_features.len()),
            file,
            legend,
        })
    }
}

/// Record a failed stage as a notice
fn guard<T>(notices: &mut Vec<Notice>, stage: Stage, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            error!(stage = %stage, kind = err.kind(), "{}", err);
            notices.push(Notice {
                stage,
                kind: err.kind(),
                message: err.to_string(),
            });
            None
        }
    }
}

fn write_model_tables(model: &TrainedModel, out: &Path) -> Result<Vec<String>> {
    to_file(out.join(EVALUATION_FILE), |f| write_evaluation(f, &model.evaluation))?;
    to_file(out.join(IMPORTANCE_FILE), |f| write_importances(f, &model.importances))?;
    to_file(out.join("x_test.csv"), |f| write_test_features(f, model))?;
    to_file(out.join("y_test.csv"), |f| write_test_target(f, model))?;
    to_file(out.join("metrics.json"), |f| write_metrics(f, &model.metrics))?;

    Ok(vec![
        EVALUATION_FILE.to_string(),
        IMPORTANCE_FILE.to_string(),
        "x_test.csv".to_string(),
        "y_test.csv".to_string(),
        "metrics.json".to_string(),
    ])
}
