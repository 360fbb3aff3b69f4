//! # Inflation Lens
//!
//! Workspace facade for Nigerian inflation analysis.
//!
//! - [`macro_math`]: regression metrics, correlation and distribution statistics
//! - [`inflation_forecast`]: CSV merging, feature assembly, random forest training and inference
//! - [`inflation_dashboard`]: charts, downloads and the Markdown report
//!
//! ## Example
//!
//! ```no_run
//! use inflation_lens::forecast::{PipelineConfig, Session};
//!
//! let config = PipelineConfig::load("config/dashboard.toml").unwrap();
//! let mut session = Session::new(config);
//! let model = session.model().unwrap();
//! println!("{}", model.metrics);
//! ```

pub use inflation_dashboard as dashboard;
pub use inflation_forecast as forecast;
pub use macro_math as math;

pub use inflation_dashboard::{Dashboard, DashboardConfig};
pub use inflation_forecast::{InflationError, Session, TrainedModel};
