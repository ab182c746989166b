//! The capability contract a model must satisfy to be selected over.
//!
//! The engine only ever calls three operations:
//! - `fit(X, y)` on a column subset of the training split
//! - `predict(X)` for residual-based criteria
//! - `score(X, y)` on the same subset of the validation split
//!
//! Adapters around models whose operations are only known at runtime (e.g. a
//! plugin or a foreign handle) report what they actually provide through
//! [`Estimator::supports`]; the selector probes it once at construction.

use nalgebra::{DMatrix, DVector};

use crate::error::SelectError;
use crate::math::r_squared;

/// One operation of the estimator contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Fit,
    Predict,
    Score,
}

impl Capability {
    pub const ALL: [Capability; 3] = [Capability::Fit, Capability::Predict, Capability::Score];

    pub fn method_name(self) -> &'static str {
        match self {
            Capability::Fit => "fit",
            Capability::Predict => "predict",
            Capability::Score => "score",
        }
    }
}

/// A trainable predictive model.
pub trait Estimator {
    /// Fit the model on `x` (rows = observations) and `y`.
    fn fit(&mut self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(), SelectError>;

    /// Predict one value per row of `x`.
    fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, SelectError>;

    /// Validation score, higher is better. Defaults to R² of `predict`.
    fn score(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<f64, SelectError> {
        let y_hat = self.predict(x)?;
        r_squared(y, &y_hat)
    }

    /// Whether the model actually provides `capability`.
    fn supports(&self, capability: Capability) -> bool {
        let _ = capability;
        true
    }

    fn name(&self) -> &str {
        "estimator"
    }
}

/// First capability `model` is missing, as a capability error.
pub fn check_capabilities<M: Estimator + ?Sized>(model: &M) -> Result<(), SelectError> {
    match Capability::ALL.into_iter().find(|&c| !model.supports(c)) {
        Some(missing) => Err(SelectError::MissingCapability {
            method: missing.method_name(),
        }),
        None => Ok(()),
    }
}

impl<E: Estimator + ?Sized> Estimator for Box<E> {
    fn fit(&mut self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(), SelectError> {
        (**self).fit(x, y)
    }

    fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, SelectError> {
        (**self).predict(x)
    }

    fn score(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<f64, SelectError> {
        (**self).score(x, y)
    }

    fn supports(&self, capability: Capability) -> bool {
        (**self).supports(capability)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
