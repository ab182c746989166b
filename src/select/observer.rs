//! Per-round progress callbacks.
//!
//! Observers see a copy of the search state once per round and cannot affect
//! control flow.

use tracing::info;

use crate::domain::RoundProgress;

pub trait RoundObserver {
    fn on_round(&mut self, progress: &RoundProgress);
}

impl<F: FnMut(&RoundProgress)> RoundObserver for F {
    fn on_round(&mut self, progress: &RoundProgress) {
        self(progress)
    }
}

/// The progress line emitted when `verbose` is set.
pub(crate) fn log_round(progress: &RoundProgress) {
    match progress.score {
        Some(score) => info!(
            direction = ?progress.direction,
            round = progress.round,
            n_features = progress.n_features,
            score,
            "selection round"
        ),
        None => info!(
            direction = ?progress.direction,
            round = progress.round,
            n_features = progress.n_features,
            "selection round"
        ),
    }
}
