//! Lagged-regression estimation with exogenous covariates.

pub mod design;
mod sarimax;

pub use sarimax::{FitSummary, Method, Sarimax};
