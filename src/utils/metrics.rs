//! Accuracy metrics for forecast evaluation.

use crate::error::{AnalysisError, Result};
use crate::utils::stats::mean;
use serde::Serialize;

fn validate(actual: &[f64], predicted: &[f64]) -> Result<usize> {
    if actual.len() != predicted.len() {
        return Err(AnalysisError::LengthMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(AnalysisError::EmptyData);
    }
    Ok(actual.len())
}

/// Mean squared error.
pub fn mse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let n = validate(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Ok(sum / n as f64)
}

/// Mean absolute error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let n = validate(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();
    Ok(sum / n as f64)
}

/// Root mean squared error, exactly `sqrt(mse)`.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    Ok(mse(actual, predicted)?.sqrt())
}

/// Theil's U statistic: `sqrt(Σ(a-p)² / Σa²)`.
///
/// Defined as 1 (worst case) when the denominator is zero.
pub fn theil_u(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    validate(actual, predicted)?;
    let numerator: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let denominator: f64 = actual.iter().map(|a| a.powi(2)).sum();

    if denominator == 0.0 {
        return Ok(1.0);
    }
    Ok((numerator / denominator).sqrt())
}

/// Pearson correlation coefficient; 0 when either series has zero variance.
pub fn correlation(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    validate(actual, predicted)?;
    let a_mean = mean(actual);
    let p_mean = mean(predicted);

    let mut numerator = 0.0;
    let mut a_sum_sq = 0.0;
    let mut p_sum_sq = 0.0;
    for (a, p) in actual.iter().zip(predicted.iter()) {
        let da = a - a_mean;
        let dp = p - p_mean;
        numerator += da * dp;
        a_sum_sq += da * da;
        p_sum_sq += dp * dp;
    }

    let denominator = (a_sum_sq * p_sum_sq).sqrt();
    if denominator == 0.0 {
        return Ok(0.0);
    }
    Ok(numerator / denominator)
}

/// Coefficient of determination `1 - SSE/SST`; 0 when SST is zero.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    validate(actual, predicted)?;
    let a_mean = mean(actual);
    let sst: f64 = actual.iter().map(|a| (a - a_mean).powi(2)).sum();
    let sse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if sst == 0.0 {
        return Ok(0.0);
    }
    Ok(1.0 - sse / sst)
}

/// Accuracy metrics for a forecast against ground truth.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastAccuracy {
    pub mse: f64,
    pub mae: f64,
    pub rmse: f64,
    pub correlation: f64,
    pub r2: f64,
    pub utheil: f64,
}

/// Compute all accuracy metrics between actual and predicted values.
pub fn forecast_accuracy(actual: &[f64], predicted: &[f64]) -> Result<ForecastAccuracy> {
    Ok(ForecastAccuracy {
        mse: mse(actual, predicted)?,
        mae: mae(actual, predicted)?,
        rmse: rmse(actual, predicted)?,
        correlation: correlation(actual, predicted)?,
        r2: r_squared(actual, predicted)?,
        utheil: theil_u(actual, predicted)?,
    })
}
