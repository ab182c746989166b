//! Command-line parsing for the `stepwise` binary.
//!
//! Argument parsing and command dispatch are kept separate from the selection
//! engine; `app` converts these structs into library configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Criterion;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "stepwise", version, about = "Greedy forward/backward feature selection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Grow a feature set from empty, adding the best column each round.
    Forward(ForwardArgs),
    /// Shrink the full feature set, removing the least useful column each round.
    Backward(BackwardArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ForwardArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub run: RunArgs,

    /// Stop once an accepted feature improves the score by less than this.
    /// Defaults to 0.5 when no stopping flag is given.
    #[arg(long, value_name = "NUM")]
    pub min_change: Option<String>,

    /// Stop at this many features (int) or this proportion of them (float).
    #[arg(long, value_name = "NUM")]
    pub max_features: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct BackwardArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub run: RunArgs,

    /// Keep this many features (int) or this proportion of them (float).
    /// Defaults to 0.5 when no stopping flag is given.
    #[arg(long, value_name = "NUM")]
    pub n_features: Option<String>,

    /// Only remove a feature if that improves the score by at least this.
    #[arg(long, value_name = "NUM")]
    pub min_change: Option<String>,
}

/// Where the data comes from and how it is split.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Headed CSV of numeric columns. Without it a synthetic dataset is used.
    #[arg(long, value_name = "CSV", requires = "target")]
    pub csv: Option<PathBuf>,

    /// Target column in the CSV.
    #[arg(long)]
    pub target: Option<String>,

    /// Synthetic rows.
    #[arg(long, default_value_t = 501)]
    pub observations: usize,

    /// Synthetic feature columns.
    #[arg(long, default_value_t = 20)]
    pub features: usize,

    /// Index of the single informative synthetic column.
    #[arg(long, default_value_t = 10)]
    pub signal: usize,

    /// Upper bound of the uniform noise added to the synthetic target.
    #[arg(long, default_value_t = 50.0)]
    pub noise_max: f64,

    /// Random seed for the synthetic data and the split.
    #[arg(long, default_value_t = 99)]
    pub seed: u64,

    /// Fraction of rows held out for validation.
    #[arg(long, default_value_t = 0.25)]
    pub val_fraction: f64,
}

/// Options shared by both searches.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// What to optimize.
    #[arg(long, value_enum, default_value_t = Criterion::Score)]
    pub criterion: Criterion,

    /// Score each round's candidates in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Log every round (and debug detail) to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Export the selection report to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}
