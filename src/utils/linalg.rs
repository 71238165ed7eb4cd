//! Dense linear algebra helpers for the lagged-regression estimator.
//!
//! Matrices are `Vec<Vec<f64>>` in row-major layout. Coefficient counts are
//! small (tens of columns), so O(k³) routines are sufficient.

/// Dot product of two equal-length slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Matrix-vector product `A v`.
pub fn mat_vec(a: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    a.iter().map(|row| dot(row, v)).collect()
}

/// Transposed matrix-vector product `Xᵀ v` without materializing Xᵀ.
pub fn xt_vec(x: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    let cols = x.first().map_or(0, |row| row.len());
    let mut out = vec![0.0; cols];
    for (row, &vi) in x.iter().zip(v.iter()) {
        for (o, &xij) in out.iter_mut().zip(row.iter()) {
            *o += xij * vi;
        }
    }
    out
}

/// Assemble the normal equations `XᵀX` and `Xᵀy` from a design matrix.
pub fn normal_equations(x: &[Vec<f64>], y: &[f64]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let k = x.first().map_or(0, |row| row.len());
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];

    for (row, &yi) in x.iter().zip(y.iter()) {
        for i in 0..k {
            let xi = row[i];
            xty[i] += xi * yi;
            for j in i..k {
                xtx[i][j] += xi * row[j];
            }
        }
    }
    // Mirror the upper triangle
    for i in 0..k {
        for j in 0..i {
            xtx[i][j] = xtx[j][i];
        }
    }

    (xtx, xty)
}

/// Return a copy of `a` with `value` added to every diagonal element.
pub fn with_ridge(a: &[Vec<f64>], value: f64) -> Vec<Vec<f64>> {
    let mut out = a.to_vec();
    for (i, row) in out.iter_mut().enumerate() {
        row[i] += value;
    }
    out
}

/// Invert a square matrix via Gauss-Jordan elimination with partial pivoting.
///
/// Returns `None` when the matrix is singular (pivot below 1e-12).
pub fn invert(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    if n == 0 || a.iter().any(|row| row.len() != n) {
        return None;
    }

    // Augmented [A | I]
    let mut aug: Vec<Vec<f64>> = a
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut r = row.clone();
            r.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
            r
        })
        .collect();

    for col in 0..n {
        // Partial pivot: largest absolute value in this column
        let pivot_row = (col..n).max_by(|&r1, &r2| {
            aug[r1][col]
                .abs()
                .partial_cmp(&aug[r2][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if aug[pivot_row][col].abs() < 1e-12 {
            return None;
        }
        aug.swap(col, pivot_row);

        let pivot = aug[col][col];
        for v in &mut aug[col] {
            *v /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = aug[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..2 * n {
                aug[row][j] -= factor * aug[col][j];
            }
        }
    }

    Some(aug.into_iter().map(|row| row[n..].to_vec()).collect())
}

/// Diagonal of a square matrix.
pub fn diagonal(a: &[Vec<f64>]) -> Vec<f64> {
    a.iter().enumerate().map(|(i, row)| row[i]).collect()
}
