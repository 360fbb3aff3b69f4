//! Markdown page for the report directory

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::report::{ReportContent, EVALUATION_FILE, IMPORTANCE_FILE, MERGED_DATA_FILE, USER_PREDICTIONS_FILE};
use macro_math::CorrelationMatrix;
use std::fmt::Write;

/// Known columns: name, description, unit
const DATA_DICTIONARY: &[(&str, &str, &str)] = &[
    ("allItemsYearOn", "YoY % change in CPI for all items (headline inflation)", "%"),
    ("foodYearOn", "YoY % change in CPI for food items", "%"),
    (
        "allItemsLessFrmProdAndEnergyYearOn",
        "Core inflation, excluding farm produce and energy",
        "%",
    ),
    ("moneySupply_M3", "Broadest money supply (M2 plus other liquid assets)", "₦ billions"),
    ("moneySupply_M2", "Broad money", "₦ billions"),
    ("narrowMoney", "Currency plus demand deposits", "₦ billions"),
    ("creditToPrivateSector", "Credit to the private sector", "₦ billions"),
    ("cbnBills", "Securities issued by the Central Bank of Nigeria", "₦ billions"),
    ("mpr", "Monetary Policy Rate", "%"),
    ("oil_price", "Crude oil price", "US$ per barrel"),
];

/// Published statistics the source tables come from
const PUBLISHERS: &[(&str, &str)] = &[
    ("Inflation Rate (CBN)", "https://www.cbn.gov.ng/rates/inflrates.html"),
    ("Money and Credit Statistics", "https://www.cbn.gov.ng/rates/mnycredit.html"),
    ("Crude Oil Price", "https://www.cbn.gov.ng/rates/crudeoil.html"),
    ("Money Market Indicators", "https://www.cbn.gov.ng/rates/mnymktind.html"),
];

/// Render the whole page
pub fn render(config: &DashboardConfig, content: &ReportContent) -> Result<String> {
    let mut md = String::new();
    let preview = config.report.preview_rows;

    writeln!(md, "# {}\n", config.report.title)?;
    writeln!(
        md,
        "Inflation, crude oil, monetary policy rate and money supply tables merged by period \
         for descriptive and inferential analysis of consumer prices in Nigeria.\n"
    )?;
    writeln!(
        md,
        "Shocks outside the data, such as disease outbreaks or conflict, limit model accuracy. \
         Exchange rates are not included.\n"
    )?;

    if !content.notices.is_empty() {
        writeln!(md, "## Notices\n")?;
        for notice in &content.notices {
            writeln!(md, "- **{}** ({}): {}", notice.stage, notice.kind, notice.message)?;
        }
        writeln!(md)?;
    }

    writeln!(md, "## Data Sources\n")?;
    if config.data.sources.is_empty() {
        writeln!(md, "No source tables configured.\n")?;
    } else {
        for source in &config.data.sources {
            writeln!(md, "- **{}**: `{}`", source.name, source.path.display())?;
        }
        writeln!(
            md,
            "\nSources are joined on period ({:?} join, {:?} periods).\n",
            config.data.join, config.data.frequency
        )?;
    }
    writeln!(md, "Published by the Central Bank of Nigeria:\n")?;
    for (label, url) in PUBLISHERS {
        writeln!(md, "- [{}]({})", label, url)?;
    }
    writeln!(md)?;

    writeln!(md, "## Data Dictionary\n")?;
    writeln!(md, "| Variable | Description | Unit |")?;
    writeln!(md, "|----------|-------------|------|")?;
    for (name, description, unit) in DATA_DICTIONARY {
        writeln!(md, "| **{}** | {} | {} |", name, description, unit)?;
    }
    writeln!(md)?;

    if let Some(frame) = &content.frame {
        writeln!(md, "## Exploratory Data Analysis\n")?;
        let periods = frame.periods();
        if let (Some(first), Some(last)) = (periods.first(), periods.last()) {
            writeln!(
                md,
                "{} rows from {} to {} across {} columns. Download: [{}]({})\n",
                frame.height(),
                first,
                last,
                frame.column_names().len(),
                MERGED_DATA_FILE,
                MERGED_DATA_FILE
            )?;
        }
    }

    for chart in content.charts.iter().filter(|c| c.file != "feature_importance.png") {
        write_chart(&mut md, &chart.title, &chart.file, &chart.legend)?;
    }

    if let Some(model) = &content.model {
        writeln!(md, "## Inflation Prediction Model\n")?;
        writeln!(
            md,
            "Random forest predicting `{}` from {} features, trained on {} rows and evaluated on the {} held-out rows.\n",
            model.target_name,
            model.feature_names.len(),
            model.train_rows,
            model.test_rows
        )?;
        writeln!(md, "| Metric | Value |")?;
        writeln!(md, "|--------|-------|")?;
        writeln!(md, "| R² | {:.4} |", model.metrics.r2)?;
        writeln!(md, "| MAE | {:.4} |", model.metrics.mae)?;
        writeln!(md, "| RMSE | {:.4} |", model.metrics.rmse)?;
        match model.metrics.rmsle {
            Some(rmsle) => writeln!(md, "| RMSLE | {:.4} |", rmsle)?,
            None => writeln!(md, "| RMSLE | n/a |")?,
        }
        writeln!(md)?;

        writeln!(md, "### Predictions on Held-out Rows\n")?;
        writeln!(md, "| Period | Model Prediction | True Values |")?;
        writeln!(md, "|--------|------------------|-------------|")?;
        for row in model.evaluation.iter().take(preview) {
            writeln!(md, "| {} | {:.4} | {:.4} |", row.period, row.predicted, row.actual)?;
        }
        writeln!(
            md,
            "\nDownloads: [{}]({}), [x_test.csv](x_test.csv), [y_test.csv](y_test.csv), [metrics.json](metrics.json)\n",
            EVALUATION_FILE, EVALUATION_FILE
        )?;

        writeln!(
            md,
            "### Top {} Most Important Features in Predicting Inflation\n",
            model.top_features.len()
        )?;
        if let Some(chart) = content.charts.iter().find(|c| c.file == "feature_importance.png") {
            writeln!(md, "![{}]({})\n\n{}\n", chart.title, chart.file, chart.legend)?;
        }
        writeln!(md, "| Rank | Feature | Importance |")?;
        writeln!(md, "|------|---------|------------|")?;
        for (rank, entry) in model.top_features.iter().enumerate() {
            writeln!(md, "| {} | {} | {:.4} |", rank + 1, entry.feature, entry.importance)?;
        }
        writeln!(md, "\nFull ranking: [{}]({})\n", IMPORTANCE_FILE, IMPORTANCE_FILE)?;
    }

    if let Some(upload) = &content.upload {
        writeln!(md, "## Predictions for the Uploaded File\n")?;
        writeln!(md, "| {} | Predicted Inflation |", upload.id_column)?;
        writeln!(md, "|---|---|")?;
        for p in upload.predictions.iter().take(preview) {
            writeln!(md, "| {} | {:.4} |", p.id, p.predicted)?;
        }
        writeln!(
            md,
            "\n{} predictions. Download: [{}]({})\n",
            upload.len(),
            USER_PREDICTIONS_FILE,
            USER_PREDICTIONS_FILE
        )?;
    }

    Ok(md)
}

fn write_chart(md: &mut String, title: &str, file: &str, legend: &str) -> Result<()> {
    writeln!(md, "### {}\n", title)?;
    writeln!(md, "![{}]({})\n", title, file)?;
    writeln!(md, "{}\n", legend.trim_end())?;
    Ok(())
}

/// Coefficient table shown under the heatmap
pub fn correlation_table(matrix: &CorrelationMatrix) -> Result<String> {
    let mut md = String::from("Cells shade from white (-1) to navy (+1); gray marks an undefined pair.\n\n|  |");
    for label in &matrix.labels {
        write!(md, " {} |", label)?;
    }
    md.push_str("\n|---|");
    md.push_str(&"---|".repeat(matrix.size()));
    md.push('\n');

    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        write!(md, "| **{}** |", label)?;
        for value in row {
            match value {
                Some(r) => write!(md, " {:.2} |", r)?,
                None => md.push_str(" n/a |"),
            }
        }
        md.push('\n');
    }
    Ok(md)
}
