//! Shared domain types.
//!
//! These types are kept small and serializable so they can be used during the
//! search, printed in reports and exported to JSON.

use clap::ValueEnum;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::SelectError;
use crate::math::{aic, bic};
use crate::models::Estimator;

/// Which scalar the search optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// The model's own `score` on the validation split (maximized).
    #[default]
    #[value(alias = "none")]
    Score,
    /// Akaike Information Criterion, AICc for small samples (minimized).
    Aic,
    /// Bayesian Information Criterion (minimized).
    Bic,
}

impl Criterion {
    pub fn display_name(self) -> &'static str {
        match self {
            Criterion::Score => "score",
            Criterion::Aic => "AIC",
            Criterion::Bic => "BIC",
        }
    }

    /// True for the information criteria, where lower is better.
    pub fn is_minimized(self) -> bool {
        !matches!(self, Criterion::Score)
    }

    /// `candidate` is strictly better than `reference`.
    pub fn improves(self, candidate: f64, reference: f64) -> bool {
        self.gain(reference, candidate) > 0.0
    }

    /// `candidate` is at least as good as `reference`.
    pub fn no_worse(self, candidate: f64, reference: f64) -> bool {
        self.gain(reference, candidate) >= 0.0
    }

    /// Improvement from `from` to `to`, positive when `to` is better.
    pub fn gain(self, from: f64, to: f64) -> f64 {
        if self.is_minimized() { from - to } else { to - from }
    }

    /// Evaluate a fitted model against `(x, y)` under this criterion.
    pub fn evaluate<M: Estimator + ?Sized>(
        self,
        model: &M,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
    ) -> Result<f64, SelectError> {
        match self {
            Criterion::Score => model.score(x, y),
            Criterion::Aic => aic(model, x, y),
            Criterion::Bic => bic(model, x, y),
        }
    }
}

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// A named feature matrix plus target.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub x: DMatrix<f64>,
    pub y: DVector<f64>,
}

/// State after one search round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundProgress {
    pub direction: Direction,
    /// 0-based round index.
    pub round: usize,
    /// Size of the working feature set after the round.
    pub n_features: usize,
    /// Score of the working feature set (`None` before the first acceptance).
    pub score: Option<f64>,
}

/// Outcome of one selection run, as printed and exported by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionReport {
    pub direction: Direction,
    pub criterion: Criterion,
    pub model: String,
    pub total_features: usize,
    pub selected: Vec<usize>,
    pub selected_names: Vec<String>,
    /// Criterion value after refitting on exactly `selected`.
    pub final_score: f64,
    pub rounds: Vec<RoundProgress>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_maximized_and_criteria_minimized() {
        assert!(Criterion::Score.improves(0.9, 0.8));
        assert!(!Criterion::Score.improves(0.8, 0.8));
        assert!(Criterion::Aic.improves(10.0, 12.0));
        assert!(!Criterion::Bic.improves(12.0, 10.0));
    }

    #[test]
    fn no_worse_accepts_ties() {
        assert!(Criterion::Score.no_worse(0.5, 0.5));
        assert!(Criterion::Aic.no_worse(3.0, 3.0));
        assert!(!Criterion::Aic.no_worse(3.5, 3.0));
    }

    #[test]
    fn gain_is_oriented() {
        assert_eq!(Criterion::Score.gain(0.25, 0.75), 0.5);
        assert_eq!(Criterion::Bic.gain(100.0, 90.0), 10.0);
    }

    #[test]
    fn criterion_round_trips_through_json() {
        let json = serde_json::to_string(&Criterion::Bic).unwrap();
        assert_eq!(json, "\"bic\"");
        let back: Criterion = serde_json::from_str("\"score\"").unwrap();
        assert_eq!(back, Criterion::Score);
    }
}
