//! Numerical building blocks: least squares and information criteria.

pub mod criterion;
pub mod ols;

pub use criterion::*;
pub use ols::*;
