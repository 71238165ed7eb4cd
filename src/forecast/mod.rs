//! Static one-step-ahead forecasting over a standardized test matrix.
//!
//! "Static" means every prediction is conditioned on the *actual* lagged
//! endogenous values from the test data, never on earlier predictions, so
//! errors do not compound across the horizon.

use crate::error::{AnalysisError, Result};
use crate::model::design::lag_context;
use crate::model::Sarimax;
use crate::transform::StandardScaler;
use crate::utils::stats::mean;
use serde::Serialize;

/// Normal quantile for a symmetric 95% interval.
const Z_95: f64 = 1.96;
const LEVEL_95: f64 = 95.0;

/// Global symmetric confidence band around the predictions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceBand {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    /// Confidence level in percent.
    pub level: f64,
    /// Band half-width divided by the normal quantile, i.e. the mean
    /// absolute prediction error.
    pub se: f64,
}

/// One-step-ahead predictions with ground truth on the original scale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticForecast {
    pub predictions: Vec<f64>,
    pub actual: Vec<f64>,
    /// Test-matrix frame indices the predictions correspond to. The first
    /// `lag_order` frames carry insufficient history and are skipped.
    pub frame_indices: Vec<usize>,
    pub confidence: ConfidenceBand,
}

/// Run static forecasting over a standardized test matrix.
///
/// `test_matrix` is rows-of-frames; `target_index` selects the standardized
/// endogenous column and `exog_indices` the exogenous columns, in the order
/// the model was fitted with. Predictions and ground truth are mapped back to
/// the original scale through `endog_scaler`.
pub fn static_forecast(
    model: &Sarimax,
    test_matrix: &[Vec<f64>],
    target_index: usize,
    exog_indices: &[usize],
    endog_scaler: &StandardScaler,
) -> Result<StaticForecast> {
    if !model.is_trained() {
        return Err(AnalysisError::ModelNotTrained);
    }
    if test_matrix.is_empty() {
        return Err(AnalysisError::EmptyData);
    }
    if exog_indices.len() != model.num_exog() {
        return Err(AnalysisError::DimensionMismatch {
            expected: model.num_exog(),
            got: exog_indices.len(),
        });
    }

    let lag = model.lag_order();
    let n_frames = test_matrix.len();
    if n_frames <= lag {
        return Err(AnalysisError::InsufficientData {
            needed: lag + 1,
            got: n_frames,
        });
    }

    let width = test_matrix[0].len();
    for row in test_matrix {
        if row.len() != width {
            return Err(AnalysisError::DimensionMismatch {
                expected: width,
                got: row.len(),
            });
        }
    }
    let max_index = exog_indices.iter().copied().max().unwrap_or(0).max(target_index);
    if max_index >= width {
        return Err(AnalysisError::DimensionMismatch {
            expected: width,
            got: max_index + 1,
        });
    }

    let endog_std: Vec<f64> = test_matrix.iter().map(|row| row[target_index]).collect();

    let mut predictions_std = Vec::with_capacity(n_frames - lag);
    let mut frame_indices = Vec::with_capacity(n_frames - lag);
    for t in lag..n_frames {
        let lags = lag_context(&endog_std, t, lag);
        let exog_at_t: Vec<f64> = exog_indices.iter().map(|&j| test_matrix[t][j]).collect();
        predictions_std.push(model.predict(&lags, &exog_at_t)?);
        frame_indices.push(t);
    }

    let predictions = endog_scaler.inverse_series(&predictions_std)?;
    let actual = endog_scaler.inverse_series(&endog_std[lag..])?;

    let abs_errors: Vec<f64> = predictions
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a).abs())
        .collect();
    let se = mean(&abs_errors);

    let upper: Vec<f64> = predictions.iter().map(|p| p + Z_95 * se).collect();
    let lower: Vec<f64> = predictions.iter().map(|p| p - Z_95 * se).collect();

    Ok(StaticForecast {
        predictions,
        actual,
        frame_indices,
        confidence: ConfidenceBand {
            upper,
            lower,
            level: LEVEL_95,
            se,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Method;
    use approx::assert_relative_eq;

    /// Fitted model plus a standardized test matrix with the endogenous
    /// channel in column 0 and one exogenous channel in column 1.
    fn fitted_setup() -> (Sarimax, Vec<Vec<f64>>, StandardScaler) {
        let n = 50;
        let exog: Vec<f64> = (0..n).map(|i| (i as f64 * 0.5).sin()).collect();
        let mut endog = vec![0.2];
        for t in 1..n {
            endog.push(0.4 * endog[t - 1] + 0.6 * exog[t]);
        }

        let mut endog_scaler = StandardScaler::new();
        let endog_std = endog_scaler.fit_transform_series(&endog).unwrap();
        let mut exog_scaler = StandardScaler::new();
        let exog_std = exog_scaler.fit_transform_series(&exog).unwrap();

        let mut model =
            Sarimax::new(endog_std.clone(), vec![exog_std.clone()], 2, Method::Ols).unwrap();
        model.fit().unwrap();

        let matrix: Vec<Vec<f64>> = endog_std
            .iter()
            .zip(exog_std.iter())
            .map(|(&e, &x)| vec![e, x])
            .collect();
        (model, matrix, endog_scaler)
    }

    #[test]
    fn skips_warmup_frames_and_indexes_the_rest() {
        let (model, matrix, scaler) = fitted_setup();
        let forecast = static_forecast(&model, &matrix, 0, &[1], &scaler).unwrap();

        assert_eq!(forecast.predictions.len(), matrix.len() - 2);
        assert_eq!(forecast.actual.len(), forecast.predictions.len());
        assert_eq!(forecast.frame_indices.first(), Some(&2));
        assert_eq!(forecast.frame_indices.last(), Some(&(matrix.len() - 1)));
    }

    #[test]
    fn predictions_track_a_deterministic_series() {
        // The series is exactly linear in its own lags and the exogenous
        // input, so static one-step predictions should be near-perfect.
        let (model, matrix, scaler) = fitted_setup();
        let forecast = static_forecast(&model, &matrix, 0, &[1], &scaler).unwrap();

        for (p, a) in forecast.predictions.iter().zip(forecast.actual.iter()) {
            assert_relative_eq!(p, a, epsilon = 0.02);
        }
        assert!(forecast.confidence.se < 0.02);
    }

    #[test]
    fn band_is_symmetric_with_fixed_half_width() {
        let (model, matrix, scaler) = fitted_setup();
        let forecast = static_forecast(&model, &matrix, 0, &[1], &scaler).unwrap();
        let band = &forecast.confidence;

        assert_eq!(band.level, 95.0);
        let half_width = 1.96 * band.se;
        for ((u, l), p) in band
            .upper
            .iter()
            .zip(band.lower.iter())
            .zip(forecast.predictions.iter())
        {
            assert_relative_eq!(u - p, half_width, epsilon = 1e-12);
            assert_relative_eq!(p - l, half_width, epsilon = 1e-12);
        }
    }

    #[test]
    fn untrained_model_is_rejected() {
        let (_, matrix, scaler) = fitted_setup();
        let untrained = Sarimax::new(vec![0.0; 10], vec![vec![0.0; 10]], 2, Method::Ols).unwrap();
        assert_eq!(
            static_forecast(&untrained, &matrix, 0, &[1], &scaler).unwrap_err(),
            AnalysisError::ModelNotTrained
        );
    }

    #[test]
    fn empty_and_short_test_data_are_rejected() {
        let (model, _, scaler) = fitted_setup();
        assert_eq!(
            static_forecast(&model, &[], 0, &[1], &scaler).unwrap_err(),
            AnalysisError::EmptyData
        );

        // Lag 2 needs at least 3 frames.
        let short = vec![vec![0.1, 0.2], vec![0.3, 0.4]];
        assert!(matches!(
            static_forecast(&model, &short, 0, &[1], &scaler),
            Err(AnalysisError::InsufficientData { needed: 3, got: 2 })
        ));
    }

    #[test]
    fn column_indices_must_fit_the_matrix() {
        let (model, matrix, scaler) = fitted_setup();
        assert!(matches!(
            static_forecast(&model, &matrix, 0, &[5], &scaler),
            Err(AnalysisError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn exog_count_must_match_the_model() {
        let (model, matrix, scaler) = fitted_setup();
        assert_eq!(
            static_forecast(&model, &matrix, 0, &[], &scaler).unwrap_err(),
            AnalysisError::DimensionMismatch {
                expected: 1,
                got: 0
            }
        );
    }
}
