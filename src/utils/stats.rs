//! Statistical utility functions.

use statrs::distribution::{ContinuousCDF, Normal};

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Two-sided p-value for a t-statistic.
///
/// Above 30 residual degrees of freedom the t-distribution is close enough
/// to normal that `2 * (1 - Φ(|t|))` is used. For small samples a coarse
/// threshold table stands in for the heavy-tailed t-distribution. The result
/// is clamped to [0.001, 0.999].
pub fn two_sided_p_value(t: f64, df: usize) -> f64 {
    let abs_t = t.abs();
    if !abs_t.is_finite() {
        return 0.999;
    }

    let p = if df > 30 {
        let normal = Normal::new(0.0, 1.0).unwrap();
        2.0 * (1.0 - normal.cdf(abs_t))
    } else if abs_t > 4.0 {
        0.001
    } else if abs_t > 3.0 {
        0.01
    } else if abs_t > 2.5 {
        0.02
    } else if abs_t > 2.0 {
        0.05
    } else if abs_t > 1.5 {
        0.1
    } else {
        0.2
    };

    p.clamp(0.001, 0.999)
}
