//! # Inflation Forecast
//!
//! A Rust library for predicting Nigerian inflation from macroeconomic
//! indicators.
//!
//! ## Features
//!
//! - Loading and period-aligned merging of CPI, money supply, policy rate and
//!   crude oil tables
//! - Feature/target assembly with lagged and percent-change predictors
//! - Random forest regression with seeded bagging and impurity importances
//! - Hold-out evaluation (R², MAE, RMSE, RMSLE)
//! - Schema-checked predictions on uploaded tables
//! - A session cache that retrains only when its inputs change
//!
//! ## Quick Start
//!
//! ```no_run
//! use inflation_forecast::{PipelineConfig, Session};
//!
//! # fn main() -> inflation_forecast::Result<()> {
//! let config = PipelineConfig::load("config/dashboard.toml")?;
//! let mut session = Session::new(config);
//!
//! let model = session.model()?;
//! println!("{}", model.metrics);
//! for entry in &model.top_features {
//!     println!("{:<40} {:.4}", entry.feature, entry.importance);
//! }
//!
//! let upload = inflation_forecast::DataLoader::read_upload("new_months.csv")?;
//! let predictions = session.predict_upload(&upload)?;
//! println!("{} predictions", predictions.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod features;
pub mod inference;
pub mod models;
pub mod session;
pub mod trainer;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{DataConfig, EvaluationConfig, FeatureConfig, PipelineConfig, SourceConfig};
pub use crate::data::{DataLoader, Frequency, JoinKind, MacroFrame};
pub use crate::error::{InflationError, Result};
pub use crate::features::{AssembledData, DerivedFeature, FeatureAssembler, TargetVariant};
pub use crate::inference::{Prediction, PredictionResult, Predictor};
pub use crate::models::{FittedRegressor, ForestConfig, RandomForestRegressor, Regressor};
pub use crate::session::Session;
pub use crate::trainer::{EvaluationRow, FeatureImportance, TrainedModel, Trainer};
pub use crate::utils::Holdout;
pub use macro_math::RegressionMetrics;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
