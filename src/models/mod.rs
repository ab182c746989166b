//! Estimator contract and the reference least-squares estimator.
//!
//! The selection engine is generic over [`Estimator`]; nothing in `select`
//! depends on a concrete model.

pub mod estimator;
pub mod least_squares;

#[cfg(test)]
pub(crate) mod fixtures;

pub use estimator::*;
pub use least_squares::*;
