//! Greedy forward selection and backward elimination.
//!
//! Both directions share one scoring path: fit the model on a column subset
//! of the training split, then evaluate it on the same subset of the
//! validation split under the configured [`Criterion`]. Every round scores all
//! candidates first and then picks a winner over the complete list, so the
//! tie-break (first candidate in column order wins exact ties) is the same
//! whether candidates were scored sequentially or in parallel.
//!
//! The model is re-fit for every candidate. After a call returns, its fitted
//! state belongs to whichever candidate was evaluated last, not to the
//! returned feature set; use [`Selector::refit`] to fit it on the result.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::data::check_pair;
use crate::domain::{Criterion, Direction, RoundProgress};
use crate::error::SelectError;
use crate::models::{Estimator, check_capabilities};
use crate::select::observer::{RoundObserver, log_round};
use crate::select::params::{BackwardParams, BackwardStop, ForwardParams, ForwardStop};

/// Selection is not meaningful over fewer columns than this.
pub const MIN_FEATURES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// What to optimize; `Score` maximizes the model's own score.
    pub criterion: Criterion,
    /// Emit one `info` event per round. Never changes the result.
    pub verbose: bool,
}

/// Borrowed data plus the scoring rule.
#[derive(Clone, Copy)]
struct Workspace<'a> {
    x_train: &'a DMatrix<f64>,
    y_train: &'a DVector<f64>,
    x_val: &'a DMatrix<f64>,
    y_val: &'a DVector<f64>,
    criterion: Criterion,
}

impl Workspace<'_> {
    fn fit_and_score<M: Estimator + ?Sized>(&self, model: &mut M, features: &[usize]) -> Result<f64, SelectError> {
        let x_train = self.x_train.select_columns(features.iter());
        let x_val = self.x_val.select_columns(features.iter());

        model.fit(&x_train, self.y_train)?;
        let score = self.criterion.evaluate(&*model, &x_val, self.y_val)?;
        if !score.is_finite() {
            return Err(SelectError::NumericDomain(format!(
                "{} is not finite for features {features:?}",
                self.criterion.display_name()
            )));
        }

        trace!(?features, score, "candidate scored");
        Ok(score)
    }
}

fn score_sequential<M: Estimator>(
    model: &mut M,
    workspace: &Workspace<'_>,
    subsets: &[Vec<usize>],
) -> Result<Vec<f64>, SelectError> {
    subsets
        .iter()
        .map(|features| workspace.fit_and_score(model, features))
        .collect()
}

fn score_parallel<M: Estimator + Clone + Send + Sync>(
    model: &M,
    workspace: &Workspace<'_>,
    subsets: &[Vec<usize>],
) -> Result<Vec<f64>, SelectError> {
    // Each candidate gets its own model; results come back in candidate order.
    subsets
        .par_iter()
        .map(|features| {
            let mut local = model.clone();
            workspace.fit_and_score(&mut local, features)
        })
        .collect()
}

/// Fans a round's state out to the tracing log and the user observer.
struct Progress<'s, 'o> {
    verbose: bool,
    observer: Option<&'s mut (dyn RoundObserver + 'o)>,
}

impl Progress<'_, '_> {
    fn emit(&mut self, progress: RoundProgress) {
        if self.verbose {
            log_round(&progress);
        }
        if let Some(observer) = self.observer.as_mut() {
            observer.on_round(&progress);
        }
    }
}

/// Greedy feature selector over a train/validation split.
///
/// Owns the model for its lifetime and borrows the four data arrays.
pub struct Selector<'a, M> {
    model: M,
    workspace: Workspace<'a>,
    n_features: usize,
    verbose: bool,
    observer: Option<Box<dyn RoundObserver + 'a>>,
}

impl<'a, M: Estimator> Selector<'a, M> {
    /// Validate the model and data, then build a selector.
    ///
    /// # Errors
    /// - capability error if the model lacks `fit`, `predict` or `score`
    /// - type error on mismatched shapes or non-finite values
    /// - boundary error if there are fewer than two feature columns
    pub fn new(
        model: M,
        x_train: &'a DMatrix<f64>,
        y_train: &'a DVector<f64>,
        x_val: &'a DMatrix<f64>,
        y_val: &'a DVector<f64>,
        config: SelectorConfig,
    ) -> Result<Self, SelectError> {
        check_capabilities(&model)?;
        check_pair("x_train", x_train, "y_train", y_train)?;
        check_pair("x_val", x_val, "y_val", y_val)?;
        if x_val.ncols() != x_train.ncols() {
            return Err(SelectError::ShapeMismatch {
                name: "x_val",
                expected: format!("{} columns (as `x_train`)", x_train.ncols()),
                found: format!("{} columns", x_val.ncols()),
            });
        }

        let n_features = x_train.ncols();
        if n_features < MIN_FEATURES {
            return Err(SelectError::TooFewFeatures {
                found: n_features,
                min: MIN_FEATURES,
            });
        }

        Ok(Self {
            model,
            workspace: Workspace {
                x_train,
                y_train,
                x_val,
                y_val,
                criterion: config.criterion,
            },
            n_features,
            verbose: config.verbose,
            observer: None,
        })
    }

    /// Attach a per-round observer.
    pub fn with_observer(mut self, observer: impl RoundObserver + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn criterion(&self) -> Criterion {
        self.workspace.criterion
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Grow a feature set from empty, one column per round.
    ///
    /// Returns the selected columns in the order they were added. The model is
    /// left fit on the last evaluated candidate.
    pub fn forward(&mut self, params: ForwardParams) -> Result<Vec<usize>, SelectError> {
        let stop = params.resolve(self.n_features)?;
        let total = self.n_features;
        let workspace = self.workspace;
        let model = &mut self.model;
        let mut progress = Progress {
            verbose: self.verbose,
            observer: self.observer.as_deref_mut(),
        };
        forward_search(total, workspace.criterion, stop, &mut progress, |subsets| {
            score_sequential(model, &workspace, subsets)
        })
    }

    /// Shrink the full feature set, one column per round.
    ///
    /// The model is left fit on the last evaluated candidate.
    pub fn backward(&mut self, params: BackwardParams) -> Result<Vec<usize>, SelectError> {
        let stop = params.resolve(self.n_features)?;
        let total = self.n_features;
        let workspace = self.workspace;
        let model = &mut self.model;
        let mut progress = Progress {
            verbose: self.verbose,
            observer: self.observer.as_deref_mut(),
        };
        backward_search(total, workspace.criterion, stop, &mut progress, |subsets| {
            score_sequential(model, &workspace, subsets)
        })
    }

    /// Fit the model on exactly `features` and return its criterion value on
    /// the validation split.
    pub fn refit(&mut self, features: &[usize]) -> Result<f64, SelectError> {
        if features.is_empty() {
            return Err(SelectError::out_of_range("features", "must not be empty"));
        }
        for (i, &f) in features.iter().enumerate() {
            if f >= self.n_features {
                return Err(SelectError::out_of_range(
                    "features",
                    format!("index {f} is not on [0, {})", self.n_features),
                ));
            }
            if features[..i].contains(&f) {
                return Err(SelectError::out_of_range("features", format!("index {f} is repeated")));
            }
        }
        let workspace = self.workspace;
        workspace.fit_and_score(&mut self.model, features)
    }
}

impl<M: Estimator + Clone + Send + Sync> Selector<'_, M> {
    /// [`Selector::forward`] with each round's candidates scored in parallel on
    /// clones of the model. Returns the same result; the owned model is not
    /// re-fit.
    pub fn par_forward(&mut self, params: ForwardParams) -> Result<Vec<usize>, SelectError> {
        let stop = params.resolve(self.n_features)?;
        let total = self.n_features;
        let workspace = self.workspace;
        let model = &self.model;
        let mut progress = Progress {
            verbose: self.verbose,
            observer: self.observer.as_deref_mut(),
        };
        forward_search(total, workspace.criterion, stop, &mut progress, |subsets| {
            score_parallel(model, &workspace, subsets)
        })
    }

    /// [`Selector::backward`] with each round's candidates scored in parallel.
    pub fn par_backward(&mut self, params: BackwardParams) -> Result<Vec<usize>, SelectError> {
        let stop = params.resolve(self.n_features)?;
        let total = self.n_features;
        let workspace = self.workspace;
        let model = &self.model;
        let mut progress = Progress {
            verbose: self.verbose,
            observer: self.observer.as_deref_mut(),
        };
        backward_search(total, workspace.criterion, stop, &mut progress, |subsets| {
            score_parallel(model, &workspace, subsets)
        })
    }
}

/// Best eligible `(feature, score)`; the first candidate wins exact ties.
fn best_candidate(
    criterion: Criterion,
    candidates: impl IntoIterator<Item = (usize, f64)>,
    eligible: impl Fn(f64) -> bool,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (feature, score) in candidates {
        if !eligible(score) {
            continue;
        }
        if best.is_none_or(|(_, b)| criterion.improves(score, b)) {
            best = Some((feature, score));
        }
    }
    best
}

fn forward_search<F>(
    total: usize,
    criterion: Criterion,
    stop: ForwardStop,
    progress: &mut Progress<'_, '_>,
    mut score: F,
) -> Result<Vec<usize>, SelectError>
where
    F: FnMut(&[Vec<usize>]) -> Result<Vec<f64>, SelectError>,
{
    let mut selected: Vec<usize> = Vec::with_capacity(total);
    let mut pool: Vec<usize> = (0..total).collect();
    let mut best: Option<f64> = None;

    for round in 0..total {
        let subsets: Vec<Vec<usize>> = pool
            .iter()
            .map(|&j| {
                let mut subset = selected.clone();
                subset.push(j);
                subset
            })
            .collect();
        let scores = score(&subsets)?;

        let winner = best_candidate(criterion, pool.iter().copied().zip(scores), |s| {
            best.is_none_or(|b| criterion.improves(s, b))
        });
        let Some((feature, feature_score)) = winner else {
            debug!(round, "no candidate improves the score");
            progress.emit(RoundProgress {
                direction: Direction::Forward,
                round,
                n_features: selected.len(),
                score: best,
            });
            break;
        };

        let gain = best.map(|b| criterion.gain(b, feature_score));
        best = Some(feature_score);
        selected.push(feature);
        pool.retain(|&j| j != feature);
        debug!(round, feature, score = feature_score, "feature added");
        progress.emit(RoundProgress {
            direction: Direction::Forward,
            round,
            n_features: selected.len(),
            score: best,
        });

        if selected.len() == total {
            break;
        }
        match stop {
            ForwardStop::MinChange(threshold) => {
                if gain.is_some_and(|g| g < threshold) {
                    debug!(round, threshold, "improvement below minimum change");
                    break;
                }
            }
            ForwardStop::MaxFeatures(max) => {
                if selected.len() >= max {
                    break;
                }
            }
        }
    }

    Ok(selected)
}

fn backward_search<F>(
    total: usize,
    criterion: Criterion,
    stop: BackwardStop,
    progress: &mut Progress<'_, '_>,
    mut score: F,
) -> Result<Vec<usize>, SelectError>
where
    F: FnMut(&[Vec<usize>]) -> Result<Vec<f64>, SelectError>,
{
    let mut selected: Vec<usize> = (0..total).collect();
    let mut baseline = score(std::slice::from_ref(&selected))?
        .first()
        .copied()
        .ok_or_else(|| SelectError::Model("no score returned for the full feature set".to_string()))?;

    for round in 0..total {
        if selected.len() <= 1 {
            break;
        }

        let subsets: Vec<Vec<usize>> = selected
            .iter()
            .map(|&j| selected.iter().copied().filter(|&f| f != j).collect())
            .collect();
        let scores = score(&subsets)?;

        let winner = best_candidate(criterion, selected.iter().copied().zip(scores), |s| {
            criterion.no_worse(s, baseline)
        });
        let halt_progress = RoundProgress {
            direction: Direction::Backward,
            round,
            n_features: selected.len(),
            score: Some(baseline),
        };
        let Some((feature, feature_score)) = winner else {
            debug!(round, "every removal lowers the score");
            progress.emit(halt_progress);
            break;
        };

        if let BackwardStop::MinChange(threshold) = stop {
            if criterion.gain(baseline, feature_score) < threshold {
                debug!(round, feature, threshold, "improvement below minimum change");
                progress.emit(halt_progress);
                break;
            }
        }

        selected.retain(|&f| f != feature);
        baseline = feature_score;
        debug!(round, feature, score = feature_score, "feature removed");
        progress.emit(RoundProgress {
            direction: Direction::Backward,
            round,
            n_features: selected.len(),
            score: Some(baseline),
        });

        if let BackwardStop::Target(target) = stop {
            if selected.len() <= target {
                break;
            }
        }
    }

    Ok(selected)
}
