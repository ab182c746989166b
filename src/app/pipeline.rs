//! The selection pipeline behind both subcommands.
//!
//! load (CSV or synthetic) -> train/validation split -> greedy search ->
//! refit on the selected set -> report

use std::path::PathBuf;

use tracing::{info, warn};

use crate::data::{SignalConfig, single_signal, train_test_split};
use crate::domain::{Criterion, Dataset, Direction, RoundProgress, SelectionReport};
use crate::error::AppError;
use crate::io::ingest::{RowError, load_dataset};
use crate::models::{Estimator, LeastSquares};
use crate::report::DataSummary;
use crate::select::{BackwardParams, ForwardParams, Selector, SelectorConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Csv { path: PathBuf, target: String },
    Synthetic(SignalConfig),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Search {
    Forward(ForwardParams),
    Backward(BackwardParams),
}

impl Search {
    pub fn direction(&self) -> Direction {
        match self {
            Search::Forward(_) => Direction::Forward,
            Search::Backward(_) => Direction::Backward,
        }
    }
}

/// Everything one run needs, resolved from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data: DataSource,
    pub val_fraction: f64,
    pub seed: u64,
    pub criterion: Criterion,
    pub search: Search,
    pub parallel: bool,
    pub verbose: bool,
    pub export: Option<PathBuf>,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: SelectionReport,
    pub data: DataSummary,
    pub row_errors: Vec<RowError>,
}

/// Execute the full selection pipeline and return the computed outputs.
pub fn run_selection(config: &RunConfig) -> Result<RunOutput, AppError> {
    let (dataset, source, row_errors) = load_data(&config.data)?;
    if !row_errors.is_empty() {
        warn!(skipped = row_errors.len(), "rows skipped during ingest");
    }

    let split = train_test_split(&dataset.x, &dataset.y, config.val_fraction, config.seed)?;

    let model = LeastSquares::new();
    let model_name = model.name().to_string();
    let selector_config = SelectorConfig {
        criterion: config.criterion,
        verbose: config.verbose,
    };

    let mut rounds: Vec<RoundProgress> = Vec::new();
    let (selected, final_score) = {
        let mut selector = Selector::new(
            model,
            &split.x_train,
            &split.y_train,
            &split.x_val,
            &split.y_val,
            selector_config,
        )?
        .with_observer(|p: &RoundProgress| rounds.push(*p));

        let selected = match (config.search, config.parallel) {
            (Search::Forward(params), false) => selector.forward(params)?,
            (Search::Forward(params), true) => selector.par_forward(params)?,
            (Search::Backward(params), false) => selector.backward(params)?,
            (Search::Backward(params), true) => selector.par_backward(params)?,
        };
        let final_score = selector.refit(&selected)?;
        (selected, final_score)
    };

    info!(?selected, final_score, "selection finished");

    let selected_names = selected
        .iter()
        .map(|&j| dataset.feature_names.get(j).cloned().unwrap_or_else(|| format!("x{j}")))
        .collect();

    Ok(RunOutput {
        report: SelectionReport {
            direction: config.search.direction(),
            criterion: config.criterion,
            model: model_name,
            total_features: dataset.x.ncols(),
            selected,
            selected_names,
            final_score,
            rounds,
        },
        data: DataSummary {
            source,
            n_train: split.x_train.nrows(),
            n_val: split.x_val.nrows(),
        },
        row_errors,
    })
}

fn load_data(source: &DataSource) -> Result<(Dataset, String, Vec<RowError>), AppError> {
    match source {
        DataSource::Csv { path, target } => {
            let ingest = load_dataset(path, target)?;
            let label = format!("{} (target={})", path.display(), ingest.dataset.target_name);
            Ok((ingest.dataset, label, ingest.row_errors))
        }
        DataSource::Synthetic(signal) => {
            let dataset = single_signal(signal)?;
            let label = format!(
                "synthetic single signal (n={}, features={}, signal=x{}, noise<{})",
                signal.observations, signal.features, signal.signal, signal.noise_max
            );
            Ok((dataset, label, Vec::new()))
        }
    }
}
