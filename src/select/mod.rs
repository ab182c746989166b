//! Greedy feature subset selection.
//!
//! [`Selector`] runs forward selection or backward elimination over the
//! columns of a train/validation split, scoring each candidate subset with the
//! configured [`Criterion`](crate::domain::Criterion).

pub mod engine;
pub mod observer;
pub mod params;

pub use engine::{MIN_FEATURES, Selector, SelectorConfig};
pub use observer::RoundObserver;
pub use params::{BackwardParams, ForwardParams, ParamValue, StopRule, normalize_count, resolve_stop_rule};
