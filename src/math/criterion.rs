//! Information criteria over a fitted model's residuals.
//!
//! Under a Gaussian error model the maximized log-likelihood is
//!
//! ```text
//! llf = -(n/2)·ln(2π) - (n/2)·ln(RSS/n) - n/2
//! ```
//!
//! and, with `k` the number of feature columns:
//!
//! - `AIC = -2·llf + 2k`, plus the small-sample term `2k(k+1)/(n-k-1)` when
//!   `n/k < 40` (AICc)
//! - `BIC = -2·llf + ln(n)·k`
//!
//! Lower is better for both. A perfect fit (`RSS = 0`) has no finite
//! log-likelihood and is reported as [`SelectError::NumericDomain`]; these
//! functions never return NaN or infinity.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::data::check_pair;
use crate::error::SelectError;
use crate::models::{Capability, Estimator};

/// Below this observations-per-feature ratio AIC gets the AICc correction.
pub const AICC_RATIO: f64 = 40.0;

/// Sum of squared residuals `Σ (y_i - ŷ_i)²`.
pub fn residual_sum_of_squares(y: &DVector<f64>, y_hat: &DVector<f64>) -> Result<f64, SelectError> {
    if y.len() != y_hat.len() {
        return Err(SelectError::Model(format!(
            "prediction length {} does not match {} observations",
            y_hat.len(),
            y.len()
        )));
    }
    let rss: f64 = y.iter().zip(y_hat.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
    if !rss.is_finite() {
        return Err(SelectError::NumericDomain(
            "residual sum of squares is not finite".to_string(),
        ));
    }
    Ok(rss)
}

/// Gaussian log-likelihood evaluated at the maximum-likelihood variance `RSS/n`.
pub fn gaussian_log_likelihood(rss: f64, n: usize) -> Result<f64, SelectError> {
    if n == 0 {
        return Err(SelectError::NumericDomain(
            "log-likelihood needs at least one observation".to_string(),
        ));
    }
    if !(rss.is_finite() && rss > 0.0) {
        return Err(SelectError::NumericDomain(format!(
            "ln(RSS/n) is undefined for RSS = {rss} (perfect or degenerate fit)"
        )));
    }
    let n_f = n as f64;
    let llf = -0.5 * n_f * (2.0 * PI).ln() - 0.5 * n_f * (rss / n_f).ln() - 0.5 * n_f;
    if !llf.is_finite() {
        return Err(SelectError::NumericDomain(format!(
            "log-likelihood is not finite for RSS = {rss}, n = {n}"
        )));
    }
    Ok(llf)
}

/// AIC (or AICc when `n/k < 40`) from a residual sum of squares.
///
/// When `n - k - 1 <= 0` the AICc term is undefined and the raw AIC is
/// returned instead.
pub fn aic_from_rss(rss: f64, n: usize, k: usize) -> Result<f64, SelectError> {
    let llf = gaussian_log_likelihood(rss, n)?;
    let (n_f, k_f) = (n as f64, k as f64);
    let raw = -2.0 * llf + 2.0 * k_f;

    if k == 0 || n_f / k_f >= AICC_RATIO {
        return Ok(raw);
    }
    if n <= k + 1 {
        debug!(n, k, "AICc correction undefined (n - k - 1 <= 0); using raw AIC");
        return Ok(raw);
    }
    Ok(raw + 2.0 * k_f * (k_f + 1.0) / (n_f - k_f - 1.0))
}

/// BIC from a residual sum of squares.
pub fn bic_from_rss(rss: f64, n: usize, k: usize) -> Result<f64, SelectError> {
    let llf = gaussian_log_likelihood(rss, n)?;
    Ok(-2.0 * llf + (n as f64).ln() * k as f64)
}

/// Akaike Information Criterion of `model` against `(x, y)`.
pub fn aic<M: Estimator + ?Sized>(
    model: &M,
    x: &DMatrix<f64>,
    y: &DVector<f64>,
) -> Result<f64, SelectError> {
    let rss = model_rss(model, x, y)?;
    aic_from_rss(rss, x.nrows(), x.ncols())
}

/// Bayesian Information Criterion of `model` against `(x, y)`.
pub fn bic<M: Estimator + ?Sized>(
    model: &M,
    x: &DMatrix<f64>,
    y: &DVector<f64>,
) -> Result<f64, SelectError> {
    let rss = model_rss(model, x, y)?;
    bic_from_rss(rss, x.nrows(), x.ncols())
}

/// Coefficient of determination `1 - RSS / SS_tot`.
pub fn r_squared(y: &DVector<f64>, y_hat: &DVector<f64>) -> Result<f64, SelectError> {
    let rss = residual_sum_of_squares(y, y_hat)?;
    if y.is_empty() {
        return Err(SelectError::NumericDomain(
            "R² needs at least one observation".to_string(),
        ));
    }
    let mean = y.mean();
    let ss_tot: f64 = y.iter().map(|v| (v - mean) * (v - mean)).sum();
    if !(ss_tot.is_finite() && ss_tot > 0.0) {
        return Err(SelectError::NumericDomain(
            "R² is undefined for a constant target".to_string(),
        ));
    }
    Ok(1.0 - rss / ss_tot)
}

fn model_rss<M: Estimator + ?Sized>(
    model: &M,
    x: &DMatrix<f64>,
    y: &DVector<f64>,
) -> Result<f64, SelectError> {
    if !model.supports(Capability::Predict) {
        return Err(SelectError::MissingCapability {
            method: Capability::Predict.method_name(),
        });
    }
    check_pair("x", x, "y", y)?;
    if x.ncols() == 0 {
        return Err(SelectError::ShapeMismatch {
            name: "x",
            expected: "at least one column".to_string(),
            found: format!("{}x{}", x.nrows(), x.ncols()),
        });
    }
    let y_hat = model.predict(x)?;
    residual_sum_of_squares(y, &y_hat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{Blind, Oracle};

    fn llf(rss: f64, n: f64) -> f64 {
        -0.5 * n * (2.0 * PI).ln() - 0.5 * n * (rss / n).ln() - 0.5 * n
    }

    #[test]
    fn aic_matches_closed_form_with_small_sample_correction() {
        // n = 4, k = 1 -> n/k = 4 < 40, AICc applies with n - k - 1 = 2.
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0]);
        let model = Oracle::new(DVector::from_row_slice(&[1.0, 2.0, 3.0, 5.0]));

        let expected = -2.0 * llf(1.0, 4.0) + 2.0 + 2.0 * 1.0 * 2.0 / 2.0;
        let got = aic(&model, &x, &y).unwrap();
        assert!((got - expected).abs() < 1e-12, "aic={got}, expected={expected}");
    }

    #[test]
    fn bic_matches_closed_form() {
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0]);
        let model = Oracle::new(DVector::from_row_slice(&[1.5, 2.0, 3.0, 4.5]));

        let expected = -2.0 * llf(0.5, 4.0) + 4.0_f64.ln();
        let got = bic(&model, &x, &y).unwrap();
        assert!((got - expected).abs() < 1e-12);
    }

    #[test]
    fn aicc_is_skipped_for_large_samples() {
        let raw = -2.0 * llf(10.0, 400.0) + 2.0;
        let got = aic_from_rss(10.0, 400, 1).unwrap();
        assert!((got - raw).abs() < 1e-12);
    }

    #[test]
    fn aicc_falls_back_to_raw_when_denominator_vanishes() {
        // n = 3, k = 2 -> n - k - 1 = 0.
        let raw = -2.0 * llf(1.0, 3.0) + 4.0;
        let got = aic_from_rss(1.0, 3, 2).unwrap();
        assert!(got.is_finite());
        assert!((got - raw).abs() < 1e-12);
    }

    #[test]
    fn perfect_fit_is_a_numeric_domain_error() {
        let x = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 3.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let model = Oracle::new(y.clone());

        for result in [aic(&model, &x, &y), bic(&model, &x, &y)] {
            let err = result.unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::NumericDomain);
        }
    }

    #[test]
    fn criteria_are_invariant_under_row_permutation() {
        let x = DMatrix::from_row_slice(5, 2, &[1.0, 0.0, 2.0, 1.0, 3.0, 0.0, 4.0, 1.0, 5.0, 0.0]);
        let y = DVector::from_row_slice(&[1.1, 2.3, 2.9, 4.2, 5.0]);
        let y_hat = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        let order = [3usize, 0, 4, 2, 1];
        let x_perm = x.select_rows(order.iter());
        let y_perm = DVector::from_iterator(5, order.iter().map(|&i| y[i]));
        let y_hat_perm = DVector::from_iterator(5, order.iter().map(|&i| y_hat[i]));

        let a = aic(&Oracle::new(y_hat), &x, &y).unwrap();
        let b = aic(&Oracle::new(y_hat_perm.clone()), &x_perm, &y_perm).unwrap();
        assert!((a - b).abs() < 1e-9);

        let y_hat = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let a = bic(&Oracle::new(y_hat), &x, &y).unwrap();
        let b = bic(&Oracle::new(y_hat_perm), &x_perm, &y_perm).unwrap();
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn shape_mismatch_is_a_type_error() {
        let x = DMatrix::zeros(3, 1);
        let y = DVector::zeros(4);
        let model = Oracle::new(DVector::zeros(3));
        let err = aic(&model, &x, &y).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Type);
    }

    #[test]
    fn model_without_predict_is_a_capability_error() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        let err = bic(&Blind, &x, &y).unwrap_err();
        assert_eq!(err, SelectError::MissingCapability { method: "predict" });
    }

    #[test]
    fn r_squared_rejects_constant_target() {
        let y = DVector::from_row_slice(&[2.0, 2.0, 2.0]);
        let y_hat = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(r_squared(&y, &y_hat).is_err());

        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let r2 = r_squared(&y, &y).unwrap();
        assert!((r2 - 1.0).abs() < 1e-12);
    }
}
