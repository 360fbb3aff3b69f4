//! # Inflation Dashboard
//!
//! Presentation layer over `inflation_forecast`: PNG charts, CSV downloads
//! and a Markdown page summarising the merged data, the trained random
//! forest and predictions for an uploaded file.
//!
//! ## Usage Example
//!
//! ```no_run
//! use inflation_dashboard::{Dashboard, DashboardConfig};
//!
//! let config = DashboardConfig::load("config/dashboard.toml").unwrap();
//! let mut dashboard = Dashboard::new(config);
//! let summary = dashboard.render("report", None).unwrap();
//! for notice in &summary.notices {
//!     eprintln!("{}: {}", notice.stage, notice.message);
//! }
//! ```

pub mod charts;
pub mod config;
pub mod error;
pub mod logging;
pub mod markdown;
pub mod report;

pub use config::{ChartSettings, DashboardConfig, ReportSettings};
pub use error::{DashboardError, Result};
pub use report::{ChartEntry, Dashboard, Notice, ReportContent, ReportSummary, Stage};
