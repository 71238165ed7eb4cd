//! SARIMAX-style lagged regression with exogenous covariates.
//!
//! The model explains an endogenous series from its own lagged values plus
//! the current values of a set of exogenous series. Three estimation methods
//! are supported: ordinary least squares, ridge-regularized least squares,
//! and an iterative maximum-likelihood variant that refines the OLS solution
//! with damped Newton steps (for i.i.d. Gaussian residuals it converges to
//! the OLS solution).

use crate::error::{AnalysisError, Result};
use crate::model::design::{design_row, lagged_design};
use crate::utils::linalg::{diagonal, dot, invert, mat_vec, normal_equations, with_ridge, xt_vec};
use crate::utils::stats::two_sided_p_value;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimal diagonal loading used to recover from a singular moment matrix.
const MINIMAL_RIDGE: f64 = 1e-10;
/// Default ridge regularization strength.
const DEFAULT_LAMBDA: f64 = 0.1;
/// Floor applied to standard errors.
const SE_FLOOR: f64 = 1e-10;
/// AR coefficient sums beyond this magnitude are treated as near unit root.
const STABILITY_THRESHOLD: f64 = 0.999;
/// Corrected AR coefficient sums are rescaled to this magnitude.
const STABILITY_TARGET: f64 = 0.995;
/// Default Newton refinement schedule for the MLE method.
const DEFAULT_MLE_ITERATIONS: usize = 10;
const DEFAULT_MLE_STEP: f64 = 0.01;

/// Coefficient estimation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Ordinary least squares via the normal equations.
    #[default]
    Ols,
    /// Ridge-regularized least squares.
    Ridge,
    /// OLS initialization refined with damped Newton steps.
    Mle,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Ols => "ols",
            Method::Ridge => "ridge",
            Method::Mle => "mle",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ols" => Ok(Method::Ols),
            "ridge" => Ok(Method::Ridge),
            "mle" => Ok(Method::Mle),
            other => Err(AnalysisError::InvalidData(format!(
                "unknown estimation method '{other}'"
            ))),
        }
    }
}

/// Read-only snapshot of a fitted model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitSummary {
    /// Coefficients ordered exogenous-first, then AR lags.
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub t_stats: Vec<f64>,
    pub p_values: Vec<f64>,
    pub residuals: Vec<f64>,
    /// Residual variance `SSE / (n - k)`.
    pub mse: f64,
    pub r_squared: f64,
    pub aic: f64,
    pub bic: f64,
    /// True when a singular moment matrix forced the minimal ridge fallback.
    pub regularization_applied: bool,
    /// True when near-unit-root AR coefficients were rescaled.
    pub stability_corrected: bool,
}

/// Lagged-regression estimator.
#[derive(Debug, Clone)]
pub struct Sarimax {
    endog: Vec<f64>,
    /// Column-major: one vector per exogenous channel, aligned with `endog`.
    exog: Vec<Vec<f64>>,
    lag_order: usize,
    method: Method,
    lambda: f64,
    mle_iterations: usize,
    mle_step: f64,
    summary: Option<FitSummary>,
}

impl Sarimax {
    /// Create an estimator for an endogenous series and aligned exogenous
    /// columns.
    pub fn new(
        endog: Vec<f64>,
        exog: Vec<Vec<f64>>,
        lag_order: usize,
        method: Method,
    ) -> Result<Self> {
        if endog.is_empty() {
            return Err(AnalysisError::EmptyData);
        }
        if lag_order == 0 {
            return Err(AnalysisError::InvalidData(
                "lag order must be positive".to_string(),
            ));
        }
        for col in &exog {
            if col.len() != endog.len() {
                return Err(AnalysisError::DimensionMismatch {
                    expected: endog.len(),
                    got: col.len(),
                });
            }
        }

        Ok(Self {
            endog,
            exog,
            lag_order,
            method,
            lambda: DEFAULT_LAMBDA,
            mle_iterations: DEFAULT_MLE_ITERATIONS,
            mle_step: DEFAULT_MLE_STEP,
            summary: None,
        })
    }

    /// Override the ridge regularization strength (default 0.1).
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Override the MLE Newton refinement schedule (default 10 steps of 0.01).
    pub fn with_mle_refinement(mut self, iterations: usize, step: f64) -> Self {
        self.mle_iterations = iterations;
        self.mle_step = step;
        self
    }

    pub fn lag_order(&self) -> usize {
        self.lag_order
    }

    pub fn num_exog(&self) -> usize {
        self.exog.len()
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn is_trained(&self) -> bool {
        self.summary.is_some()
    }

    pub fn coefficients(&self) -> Option<&[f64]> {
        self.summary.as_ref().map(|s| s.coefficients.as_slice())
    }

    /// Snapshot of the fit statistics; errors before `fit`.
    pub fn summary(&self) -> Result<&FitSummary> {
        self.summary.as_ref().ok_or(AnalysisError::ModelNotTrained)
    }

    /// Fit coefficients and statistics on the stored series.
    pub fn fit(&mut self) -> Result<&FitSummary> {
        let (x, y) = lagged_design(&self.endog, &self.exog, self.lag_order)?;
        let n = y.len();
        let k = self.exog.len() + self.lag_order;
        if n <= k {
            return Err(AnalysisError::InsufficientData {
                needed: k + 1,
                got: n,
            });
        }

        let (xtx, xty) = normal_equations(&x, &y);
        let mut regularization_applied = false;

        // Moment matrix used for coefficient estimation. Ridge loads the
        // diagonal with lambda up front; the other methods fall back to a
        // minimal loading only if the matrix turns out singular.
        let estimation_matrix = match self.method {
            Method::Ridge => with_ridge(&xtx, self.lambda),
            Method::Ols | Method::Mle => xtx.clone(),
        };
        let estimation_inv = match invert(&estimation_matrix) {
            Some(inv) => inv,
            None => {
                warn!(
                    "moment matrix is singular; retrying with minimal regularization ({MINIMAL_RIDGE:e})"
                );
                regularization_applied = true;
                invert(&with_ridge(&estimation_matrix, MINIMAL_RIDGE)).ok_or_else(|| {
                    AnalysisError::Computation(
                        "moment matrix inversion failed after regularization".to_string(),
                    )
                })?
            }
        };
        let mut coefficients = mat_vec(&estimation_inv, &xty);

        if self.method == Method::Mle {
            // Damped Newton refinement of the Gaussian log-likelihood. At the
            // OLS solution the gradient X'(y - Xb) is zero, so this is a
            // no-op there; it exists to pull slightly perturbed starts back.
            for _ in 0..self.mle_iterations {
                let fitted: Vec<f64> = x.iter().map(|row| dot(row, &coefficients)).collect();
                let residuals: Vec<f64> =
                    y.iter().zip(fitted.iter()).map(|(yi, fi)| yi - fi).collect();
                let gradient = xt_vec(&x, &residuals);
                let delta = mat_vec(&estimation_inv, &gradient);
                for (c, d) in coefficients.iter_mut().zip(delta.iter()) {
                    *c += self.mle_step * d;
                }
            }
        }

        // Near-unit-root AR dynamics are explosive in simulation; rescale the
        // AR block only. Ridge already shrinks coefficients, so it is exempt.
        let mut stability_corrected = false;
        if self.method != Method::Ridge {
            let num_exog = self.exog.len();
            let ar_sum: f64 = coefficients[num_exog..].iter().sum();
            if ar_sum.abs() > STABILITY_THRESHOLD {
                let factor = STABILITY_TARGET / ar_sum.abs();
                warn!(
                    "AR coefficient sum {ar_sum:.6} is near unit root; rescaling AR block by {factor:.6}"
                );
                for c in &mut coefficients[num_exog..] {
                    *c *= factor;
                }
                stability_corrected = true;
            }
        }

        // Residual statistics use the (possibly corrected) coefficients.
        let fitted: Vec<f64> = x.iter().map(|row| dot(row, &coefficients)).collect();
        let residuals: Vec<f64> = y
            .iter()
            .zip(fitted.iter())
            .map(|(yi, fi)| yi - fi)
            .collect();
        let sse: f64 = residuals.iter().map(|r| r * r).sum();
        let sigma2 = sse / (n - k) as f64;

        // Inference always uses the unregularized X'X, so ridge standard
        // errors are not deflated by the penalty.
        let inference_inv = match invert(&xtx) {
            Some(inv) => inv,
            None => {
                warn!(
                    "unregularized moment matrix is singular for inference; applying minimal regularization"
                );
                regularization_applied = true;
                invert(&with_ridge(&xtx, MINIMAL_RIDGE)).ok_or_else(|| {
                    AnalysisError::Computation(
                        "covariance matrix inversion failed after regularization".to_string(),
                    )
                })?
            }
        };

        let std_errors: Vec<f64> = diagonal(&inference_inv)
            .iter()
            .map(|v| (sigma2 * v).abs().sqrt().max(SE_FLOOR))
            .collect();

        let t_stats: Vec<f64> = coefficients
            .iter()
            .zip(std_errors.iter())
            .map(|(c, se)| {
                let t = c / se;
                if t.is_finite() {
                    t
                } else {
                    0.0
                }
            })
            .collect();

        let df = n - k;
        let p_values: Vec<f64> = t_stats.iter().map(|&t| two_sided_p_value(t, df)).collect();

        let mean_y: f64 = y.iter().sum::<f64>() / n as f64;
        let sst: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
        let r_squared = if sst == 0.0 { 0.0 } else { 1.0 - sse / sst };

        let kf = k as f64;
        let nf = n as f64;
        let aic = 2.0 * kf - 2.0 * (sse / nf).ln();
        let bic = kf * nf.ln() - 2.0 * (sse / nf).ln();

        let summary = FitSummary {
            coefficients,
            std_errors,
            t_stats,
            p_values,
            residuals,
            mse: sigma2,
            r_squared,
            aic,
            bic,
            regularization_applied,
            stability_corrected,
        };
        Ok(self.summary.insert(summary))
    }

    /// One-step prediction from an endogenous lag context (most recent lag
    /// first) and the current exogenous values.
    ///
    /// The input is assembled exogenous-first, matching the design matrix
    /// column order used by `fit`.
    pub fn predict(&self, endog_context: &[f64], exog_context: &[f64]) -> Result<f64> {
        let summary = self.summary()?;
        let input = design_row(exog_context, endog_context);
        if input.len() != summary.coefficients.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: summary.coefficients.len(),
                got: input.len(),
            });
        }
        Ok(dot(&input, &summary.coefficients))
    }
}
