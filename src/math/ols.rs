//! Least-squares solver used by the reference estimator.
//!
//! ```text
//! minimize ‖y - X β‖²
//! ```
//!
//! The design matrix is tall (observations ≫ columns) and may be rank
//! deficient when a candidate feature subset contains collinear columns, so we
//! solve through the SVD: singular values below `tol · σ_max` are treated as
//! zero, which yields the minimum-norm solution instead of a failure.

use nalgebra::{DMatrix, DVector};

/// Relative cut-offs tried in order, from strict to loose.
const RELATIVE_TOLERANCES: [f64; 3] = [1e-12, 1e-10, 1e-8];

/// Solve a least squares problem using SVD.
///
/// Returns `None` when the matrix is empty or no tolerance produces a finite
/// solution.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() == 0 || x.ncols() == 0 || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    if !sigma_max.is_finite() {
        return None;
    }
    if sigma_max == 0.0 {
        // All-zero design: every coefficient is unidentified.
        return Some(DVector::zeros(x.ncols()));
    }

    RELATIVE_TOLERANCES.iter().find_map(|&rel| {
        svd.solve(y, rel * sigma_max)
            .ok()
            .filter(|beta| beta.iter().all(|v| v.is_finite()))
    })
}
