//! Data helpers: the synthetic single-signal dataset and train/validation splits.

pub mod split;
pub mod synthetic;

pub use split::*;
pub use synthetic::*;
