//! Ordinary least squares with an intercept.
//!
//! This is the reference estimator used by the `stepwise` binary and the
//! end-to-end tests. The regression is solved on centered data:
//!
//! ```text
//! y - ȳ = Σ_j β_j (x_j - x̄_j)
//! ```
//!
//! Columns that are constant on the training rows carry no information beyond
//! the intercept and are left out of the solve (their coefficient is exactly
//! zero). Fits that differ only by such columns therefore produce bit-identical
//! predictions, which keeps score comparisons in the search exact.

use nalgebra::{DMatrix, DVector};

use crate::error::SelectError;
use crate::math::solve_least_squares;
use crate::models::Estimator;

#[derive(Debug, Clone)]
struct Coefficients {
    n_features: usize,
    intercept: f64,
    /// `(column, x̄_column, β_column)` for every non-constant column.
    active: Vec<(usize, f64, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct LeastSquares {
    fitted: Option<Coefficients>,
}

impl LeastSquares {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intercept of the last fit, if any.
    pub fn intercept(&self) -> Option<f64> {
        self.fitted.as_ref().map(|c| c.intercept)
    }

    /// Coefficient per input column of the last fit (zero for constant columns).
    pub fn coefficients(&self) -> Option<Vec<f64>> {
        self.fitted.as_ref().map(|c| {
            let mut out = vec![0.0; c.n_features];
            for &(j, _, beta) in &c.active {
                out[j] = beta;
            }
            out
        })
    }
}

impl Estimator for LeastSquares {
    fn fit(&mut self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(), SelectError> {
        let (n, p) = x.shape();
        if n == 0 || n != y.len() {
            return Err(SelectError::ShapeMismatch {
                name: "y",
                expected: format!("length {n} (> 0)"),
                found: format!("length {}", y.len()),
            });
        }

        let y_mean = y.mean();
        let active_cols: Vec<usize> = (0..p)
            .filter(|&j| {
                let col = x.column(j);
                let first = col[0];
                col.iter().any(|&v| v != first)
            })
            .collect();

        if active_cols.is_empty() {
            self.fitted = Some(Coefficients {
                n_features: p,
                intercept: y_mean,
                active: Vec::new(),
            });
            return Ok(());
        }

        let means: Vec<f64> = active_cols.iter().map(|&j| x.column(j).mean()).collect();
        let centered = DMatrix::from_fn(n, active_cols.len(), |i, a| x[(i, active_cols[a])] - means[a]);
        let y_centered = y.map(|v| v - y_mean);

        let beta = solve_least_squares(&centered, &y_centered).ok_or_else(|| {
            SelectError::Model("least squares system is too ill-conditioned to solve".to_string())
        })?;

        self.fitted = Some(Coefficients {
            n_features: p,
            intercept: y_mean,
            active: active_cols
                .into_iter()
                .zip(means)
                .zip(beta.iter().copied())
                .map(|((j, mean), b)| (j, mean, b))
                .collect(),
        });
        Ok(())
    }

    fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, SelectError> {
        let Some(coef) = &self.fitted else {
            return Err(SelectError::Model("predict called before fit".to_string()));
        };
        if x.ncols() != coef.n_features {
            return Err(SelectError::ShapeMismatch {
                name: "x",
                expected: format!("{} columns", coef.n_features),
                found: format!("{} columns", x.ncols()),
            });
        }

        Ok(DVector::from_fn(x.nrows(), |i, _| {
            coef.active
                .iter()
                .fold(coef.intercept, |acc, &(j, mean, beta)| acc + beta * (x[(i, j)] - mean))
        }))
    }

    fn name(&self) -> &str {
        "least-squares"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_linear_relationship() {
        // y = 1 + 2 x0 - x1
        let x = DMatrix::from_row_slice(5, 2, &[0.0, 1.0, 1.0, 0.0, 2.0, 2.0, 3.0, 1.0, 4.0, 5.0]);
        let y = DVector::from_fn(5, |i, _| 1.0 + 2.0 * x[(i, 0)] - x[(i, 1)]);

        let mut model = LeastSquares::new();
        model.fit(&x, &y).unwrap();
        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((coef[1] + 1.0).abs() < 1e-9);

        let y_hat = model.predict(&x).unwrap();
        for (a, b) in y.iter().zip(y_hat.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_columns_do_not_change_predictions() {
        let signal = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0];
        let y = DVector::from_row_slice(&[1.5, 4.1, 2.2, 8.3, 4.9, 7.4]);

        let x1 = DMatrix::from_fn(6, 1, |i, _| signal[i]);
        let x2 = DMatrix::from_fn(6, 3, |i, j| if j == 1 { signal[i] } else { 0.0 });

        let mut a = LeastSquares::new();
        let mut b = LeastSquares::new();
        a.fit(&x1, &y).unwrap();
        b.fit(&x2, &y).unwrap();

        let pa = a.predict(&x1).unwrap();
        let pb = b.predict(&x2).unwrap();
        assert_eq!(pa, pb);
        assert_eq!(a.score(&x1, &y).unwrap(), b.score(&x2, &y).unwrap());
    }

    #[test]
    fn all_constant_design_predicts_the_mean() {
        let x = DMatrix::zeros(4, 2);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 6.0]);
        let mut model = LeastSquares::new();
        model.fit(&x, &y).unwrap();
        let y_hat = model.predict(&x).unwrap();
        assert!(y_hat.iter().all(|&v| (v - 3.0).abs() < 1e-12));
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = LeastSquares::new();
        assert!(model.predict(&DMatrix::zeros(1, 1)).is_err());
    }

    #[test]
    fn predict_checks_column_count() {
        let mut model = LeastSquares::new();
        let x = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 3.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        model.fit(&x, &y).unwrap();
        let err = model.predict(&DMatrix::zeros(3, 2)).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Type);
    }
}
