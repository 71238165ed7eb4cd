//! Per-feature standardization (z-score scaling) with inverse transform.

use crate::error::{AnalysisError, Result};

/// Minimum standard deviation stored for a feature. Zero-variance features
/// are floored to this value so transforms never divide by zero.
const STD_FLOOR: f64 = 1e-8;

/// Standardizes samples to zero mean and unit variance per feature.
///
/// Follows a fit-then-transform contract: statistics are computed once by
/// [`fit`](StandardScaler::fit) and reused by every subsequent
/// `transform` / `inverse_transform` call. Transforming before fitting is an
/// error.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
    fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute per-feature mean and population standard deviation.
    ///
    /// `data` is rows-of-features: one inner vector per observation. All rows
    /// must have the same width. Zero standard deviations are floored to
    /// 1e-8.
    pub fn fit(&mut self, data: &[Vec<f64>]) -> Result<()> {
        if data.is_empty() || data[0].is_empty() {
            return Err(AnalysisError::EmptyData);
        }

        let num_features = data[0].len();
        let num_samples = data.len();
        for row in data {
            if row.len() != num_features {
                return Err(AnalysisError::DimensionMismatch {
                    expected: num_features,
                    got: row.len(),
                });
            }
        }

        let mut mean = vec![0.0; num_features];
        for row in data {
            for (m, &v) in mean.iter_mut().zip(row.iter()) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= num_samples as f64;
        }

        let mut std = vec![0.0; num_features];
        for row in data {
            for (j, &v) in row.iter().enumerate() {
                std[j] += (v - mean[j]).powi(2);
            }
        }
        for s in &mut std {
            *s = (*s / num_samples as f64).sqrt();
            if *s < STD_FLOOR {
                *s = STD_FLOOR;
            }
        }

        self.mean = mean;
        self.std = std;
        self.fitted = true;
        Ok(())
    }

    /// Apply `(x - mean) / std` per feature.
    pub fn transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.check_fitted()?;
        data.iter()
            .map(|row| {
                self.check_width(row)?;
                Ok(row
                    .iter()
                    .enumerate()
                    .map(|(j, &v)| (v - self.mean[j]) / self.std[j])
                    .collect())
            })
            .collect()
    }

    /// Apply `x * std + mean` per feature, recovering the original scale.
    pub fn inverse_transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.check_fitted()?;
        data.iter()
            .map(|row| {
                self.check_width(row)?;
                Ok(row
                    .iter()
                    .enumerate()
                    .map(|(j, &v)| v * self.std[j] + self.mean[j])
                    .collect())
            })
            .collect()
    }

    /// Fit then transform in one call.
    pub fn fit_transform(&mut self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.fit(data)?;
        self.transform(data)
    }

    /// Fit on a 1-D series treated as a single-feature sample.
    pub fn fit_series(&mut self, series: &[f64]) -> Result<()> {
        let rows: Vec<Vec<f64>> = series.iter().map(|&v| vec![v]).collect();
        self.fit(&rows)
    }

    /// Transform a 1-D single-feature series.
    pub fn transform_series(&self, series: &[f64]) -> Result<Vec<f64>> {
        self.check_fitted()?;
        self.check_single_feature()?;
        Ok(series
            .iter()
            .map(|&v| (v - self.mean[0]) / self.std[0])
            .collect())
    }

    /// Inverse-transform a 1-D single-feature series.
    pub fn inverse_series(&self, series: &[f64]) -> Result<Vec<f64>> {
        self.check_fitted()?;
        self.check_single_feature()?;
        Ok(series
            .iter()
            .map(|&v| v * self.std[0] + self.mean[0])
            .collect())
    }

    /// Fit then transform a 1-D single-feature series.
    pub fn fit_transform_series(&mut self, series: &[f64]) -> Result<Vec<f64>> {
        self.fit_series(series)?;
        self.transform_series(series)
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Per-feature means computed by the last `fit`.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Per-feature standard deviations computed by the last `fit`.
    pub fn std(&self) -> &[f64] {
        &self.std
    }

    fn check_fitted(&self) -> Result<()> {
        if self.fitted {
            Ok(())
        } else {
            Err(AnalysisError::NotFitted)
        }
    }

    fn check_width(&self, row: &[f64]) -> Result<()> {
        if row.len() == self.mean.len() {
            Ok(())
        } else {
            Err(AnalysisError::DimensionMismatch {
                expected: self.mean.len(),
                got: row.len(),
            })
        }
    }

    fn check_single_feature(&self) -> Result<()> {
        if self.mean.len() == 1 {
            Ok(())
        } else {
            Err(AnalysisError::DimensionMismatch {
                expected: self.mean.len(),
                got: 1,
            })
        }
    }
}
