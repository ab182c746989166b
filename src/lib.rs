//! `stepwise` library crate.
//!
//! Greedy forward selection and backward elimination of feature columns for
//! any model implementing [`models::Estimator`], guided by the model's own
//! validation score or by AIC/BIC.
//!
//! The binary (`stepwise`) is a thin wrapper around this library so the
//! selection engine is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod report;
pub mod select;
