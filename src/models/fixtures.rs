//! Test doubles for the estimator contract.

use nalgebra::{DMatrix, DVector};

use crate::error::SelectError;
use crate::models::{Capability, Estimator};

/// Predicts a fixed vector regardless of its input.
#[derive(Debug, Clone)]
pub struct Oracle {
    y_hat: DVector<f64>,
}

impl Oracle {
    pub fn new(y_hat: DVector<f64>) -> Self {
        Self { y_hat }
    }
}

impl Estimator for Oracle {
    fn fit(&mut self, _x: &DMatrix<f64>, _y: &DVector<f64>) -> Result<(), SelectError> {
        Ok(())
    }

    fn predict(&self, _x: &DMatrix<f64>) -> Result<DVector<f64>, SelectError> {
        Ok(self.y_hat.clone())
    }
}

/// An adapter whose wrapped model cannot predict.
#[derive(Debug, Clone, Copy)]
pub struct Blind;

impl Estimator for Blind {
    fn fit(&mut self, _x: &DMatrix<f64>, _y: &DVector<f64>) -> Result<(), SelectError> {
        Ok(())
    }

    fn predict(&self, _x: &DMatrix<f64>) -> Result<DVector<f64>, SelectError> {
        Err(SelectError::MissingCapability { method: "predict" })
    }

    fn supports(&self, capability: Capability) -> bool {
        capability != Capability::Predict
    }
}

/// Scores a subset by looking up each selected column's weight in a table.
///
/// `score = Σ weights[j] - penalty · |S|`, which makes the greedy path fully
/// predictable. Column identity is recovered from the first row of the
/// training matrix, which holds the column index.
#[derive(Debug, Clone)]
pub struct Additive {
    weights: Vec<f64>,
    penalty: f64,
    columns: Vec<usize>,
    pub fits: usize,
}

impl Additive {
    pub fn new(weights: Vec<f64>, penalty: f64) -> Self {
        Self {
            weights,
            penalty,
            columns: Vec::new(),
            fits: 0,
        }
    }

    /// Matrix whose first row encodes column indices; the rest is filler.
    pub fn design(n_rows: usize, n_cols: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n_rows, n_cols, |i, j| if i == 0 { j as f64 } else { 1.0 })
    }
}

impl Estimator for Additive {
    fn fit(&mut self, x: &DMatrix<f64>, _y: &DVector<f64>) -> Result<(), SelectError> {
        self.columns = x.row(0).iter().map(|&v| v as usize).collect();
        self.fits += 1;
        Ok(())
    }

    fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, SelectError> {
        Ok(DVector::zeros(x.nrows()))
    }

    fn score(&self, _x: &DMatrix<f64>, _y: &DVector<f64>) -> Result<f64, SelectError> {
        let total: f64 = self.columns.iter().map(|&j| self.weights[j]).sum();
        Ok(total - self.penalty * self.columns.len() as f64)
    }
}
