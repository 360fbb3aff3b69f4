//! Command-line entry point for the inflation dashboard.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use inflation_dashboard::{logging, Dashboard, DashboardConfig};
use inflation_forecast::export::{to_file, write_predictions};
use inflation_forecast::DataLoader;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "inflation_dashboard")]
#[command(about = "Nigerian inflation analysis and prediction dashboard", long_about = None)]
struct Cli {
    /// Dashboard configuration file
    #[arg(short, long, env = "INFLATION_DASHBOARD_CONFIG", default_value = "config/dashboard.toml")]
    config: PathBuf,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write charts, downloads and dashboard.md into a directory
    Report {
        /// Report directory
        #[arg(short, long, default_value = "report")]
        out: PathBuf,

        /// CSV with the trained feature columns to predict
        #[arg(short, long)]
        upload: Option<PathBuf>,
    },

    /// Train the model and print metrics and the importance ranking
    Train,

    /// Predict an uploaded CSV with a freshly trained model
    Predict {
        /// CSV with the trained feature columns
        #[arg(short, long)]
        upload: PathBuf,

        /// Output CSV
        #[arg(short, long, default_value = "user_inflation_predictions.csv")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = DashboardConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let mut dashboard = Dashboard::new(config);

    match cli.command {
        Commands::Report { out, upload } => {
            let summary = dashboard.render(&out, upload.as_deref())?;
            println!("Report written to {}", summary.out_dir.display());
            for file in &summary.files {
                println!("  {}", file.display());
            }
            if !summary.notices.is_empty() {
                println!("\nNotices:");
                for notice in &summary.notices {
                    println!("  [{}] {}: {}", notice.stage, notice.kind, notice.message);
                }
            }
        }
        Commands::Train => {
            let session = dashboard.session_mut();
            session.load().context("loading data")?;
            let model = session.model().context("training model")?;

            println!(
                "Target: {} ({} train rows, {} test rows)",
                model.target_name, model.train_rows, model.test_rows
            );
            println!("{}", model.metrics);
            println!("\nFeature importances:");
            for (rank, entry) in model.importances.iter().enumerate() {
                println!("{:>3}. {:<40} {:.4}", rank + 1, entry.feature, entry.importance);
            }
        }
        Commands::Predict { upload, out } => {
            if !upload.is_file() {
                bail!("upload file {} does not exist", upload.display());
            }
            let session = dashboard.session_mut();
            session.load().context("loading data")?;
            session.model().context("training model")?;

            let df = DataLoader::read_upload(&upload)?;
            let result = session.predict_upload(&df)?;
            to_file(&out, |f| write_predictions(f, &result))?;
            info!(rows = result.len(), out = %out.display(), "wrote predictions");
            println!("{} predictions written to {}", result.len(), out.display());
        }
    }

    Ok(())
}
