//! # kinelag
//!
//! Lagged-regression influence analysis for motion capture time series.
//!
//! Given parsed per-frame joint rotation channels, the engine identifies
//! predictive relationships between a chosen target channel and the remaining
//! channels using an autoregressive model with exogenous covariates. It
//! provides standardization, three estimation methods (OLS, ridge, iterative
//! MLE), coefficient significance statistics, one-step-ahead static
//! forecasting with a 95% confidence band, and accuracy metrics, wired
//! together by [`analysis::SarimaxAnalyzer`].

#![allow(clippy::needless_range_loop)]

pub mod analysis;
pub mod core;
pub mod error;
pub mod forecast;
pub mod model;
pub mod transform;
pub mod utils;

pub use error::{AnalysisError, Result};

pub mod prelude {
    pub use crate::analysis::{AnalysisConfig, AnalysisOutcome, AnalysisResult, SarimaxAnalyzer};
    pub use crate::core::{Axis, MotionDataset};
    pub use crate::error::{AnalysisError, Result};
    pub use crate::forecast::{static_forecast, ConfidenceBand, StaticForecast};
    pub use crate::model::{Method, Sarimax};
    pub use crate::transform::StandardScaler;
    pub use crate::utils::metrics::{forecast_accuracy, ForecastAccuracy};
}
