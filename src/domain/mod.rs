//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the optimization target (`Criterion`) and search `Direction`
//! - the named `Dataset` loaded by the binary
//! - per-round progress and the exported `SelectionReport`

pub mod types;

pub use types::*;
