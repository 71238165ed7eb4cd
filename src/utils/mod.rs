//! Shared numerical utilities.

pub mod linalg;
pub mod metrics;
pub mod stats;

pub use metrics::{forecast_accuracy, ForecastAccuracy};
pub use stats::two_sided_p_value;
