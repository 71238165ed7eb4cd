//! Lagged design matrix construction.
//!
//! The column order produced here is the single source of truth shared by
//! fitting and prediction: exogenous values at frame t first, then endogenous
//! lags most recent first (t-1 ... t-L).

use crate::error::{AnalysisError, Result};

/// Assemble one design row from exogenous values and endogenous lags.
pub fn design_row(exog_at_t: &[f64], endog_lags: &[f64]) -> Vec<f64> {
    let mut row = Vec::with_capacity(exog_at_t.len() + endog_lags.len());
    row.extend_from_slice(exog_at_t);
    row.extend_from_slice(endog_lags);
    row
}

/// Endogenous lag context for frame `t`: `[endog[t-1], ..., endog[t-L]]`.
///
/// Caller must guarantee `t >= lag_order`.
pub fn lag_context(endog: &[f64], t: usize, lag_order: usize) -> Vec<f64> {
    (1..=lag_order).map(|lag| endog[t - lag]).collect()
}

/// Build the lagged design matrix and label vector.
///
/// The first `lag_order` frames carry insufficient history and are discarded,
/// so the output has `endog.len() - lag_order` rows. Exogenous columns must
/// be aligned with the endogenous series (same length).
pub fn lagged_design(
    endog: &[f64],
    exog: &[Vec<f64>],
    lag_order: usize,
) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
    let n_frames = endog.len();
    if n_frames <= lag_order {
        return Err(AnalysisError::InsufficientData {
            needed: lag_order + 1,
            got: n_frames,
        });
    }
    for col in exog {
        if col.len() != n_frames {
            return Err(AnalysisError::DimensionMismatch {
                expected: n_frames,
                got: col.len(),
            });
        }
    }

    let mut x = Vec::with_capacity(n_frames - lag_order);
    let mut y = Vec::with_capacity(n_frames - lag_order);
    for t in lag_order..n_frames {
        let exog_at_t: Vec<f64> = exog.iter().map(|col| col[t]).collect();
        let lags = lag_context(endog, t, lag_order);
        x.push(design_row(&exog_at_t, &lags));
        y.push(endog[t]);
    }

    Ok((x, y))
}
