//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments into a [`RunConfig`]
//! - runs the selection pipeline
//! - prints the report and writes the optional export

use clap::Parser;

use crate::cli::{BackwardArgs, Command, DataArgs, ForwardArgs, RunArgs};
use crate::data::SignalConfig;
use crate::error::{AppError, SelectError};
use crate::select::{BackwardParams, ForwardParams, ParamValue};

pub mod pipeline;

use pipeline::{DataSource, RunConfig, Search};

/// Entry point for the `stepwise` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    let config = match &cli.command {
        Command::Forward(args) => run_config_from_forward(args)?,
        Command::Backward(args) => run_config_from_backward(args)?,
    };

    if let Err(err) = crate::logging::init(config.verbose) {
        eprintln!("warning: {err}");
    }

    handle_run(&config)
}

fn handle_run(config: &RunConfig) -> Result<(), AppError> {
    let run = pipeline::run_selection(config)?;

    println!("{}", crate::report::format_selection_summary(&run.report, &run.data));
    for e in &run.row_errors {
        eprintln!("skipped line {}: {}", e.line, e.message);
    }

    if let Some(path) = &config.export {
        crate::io::export::write_report_json(path, &run.report)?;
    }

    Ok(())
}

pub fn run_config_from_forward(args: &ForwardArgs) -> Result<RunConfig, AppError> {
    let min_change = parse_param("min_change", args.min_change.as_deref())?;
    let max_features = parse_param("max_features", args.max_features.as_deref())?;
    let params = if min_change.is_none() && max_features.is_none() {
        ForwardParams::default()
    } else {
        ForwardParams {
            min_change,
            max_features,
        }
    };
    Ok(run_config(&args.data, &args.run, Search::Forward(params)))
}

pub fn run_config_from_backward(args: &BackwardArgs) -> Result<RunConfig, AppError> {
    let n_features = parse_param("n_features", args.n_features.as_deref())?;
    let min_change = parse_param("min_change", args.min_change.as_deref())?;
    let params = if n_features.is_none() && min_change.is_none() {
        BackwardParams::default()
    } else {
        BackwardParams {
            n_features,
            min_change,
        }
    };
    Ok(run_config(&args.data, &args.run, Search::Backward(params)))
}

fn parse_param(name: &str, raw: Option<&str>) -> Result<Option<ParamValue>, SelectError> {
    raw.map(|r| ParamValue::parse(name, r)).transpose()
}

fn run_config(data: &DataArgs, run: &RunArgs, search: Search) -> RunConfig {
    let source = match (&data.csv, &data.target) {
        (Some(path), Some(target)) => DataSource::Csv {
            path: path.clone(),
            target: target.clone(),
        },
        _ => DataSource::Synthetic(SignalConfig {
            observations: data.observations,
            features: data.features,
            signal: data.signal,
            noise_max: data.noise_max,
            seed: data.seed,
        }),
    };

    RunConfig {
        data: source,
        val_fraction: data.val_fraction,
        seed: data.seed,
        criterion: run.criterion,
        search,
        parallel: run.parallel,
        verbose: run.verbose,
        export: run.export.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn forward_args(argv: &[&str]) -> ForwardArgs {
        let mut full = vec!["stepwise", "forward"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Forward(args) => args,
            Command::Backward(_) => panic!("expected forward"),
        }
    }

    #[test]
    fn no_stopping_flag_uses_the_default() {
        let config = run_config_from_forward(&forward_args(&[])).unwrap();
        assert_eq!(config.search, Search::Forward(ForwardParams::default()));
        assert!(matches!(config.data, DataSource::Synthetic(_)));
    }

    #[test]
    fn one_flag_replaces_the_default() {
        let config = run_config_from_forward(&forward_args(&["--max-features", "0.25"])).unwrap();
        assert_eq!(
            config.search,
            Search::Forward(ForwardParams {
                min_change: None,
                max_features: Some(ParamValue::Float(0.25)),
            })
        );
    }

    #[test]
    fn non_numeric_flag_is_a_named_type_error() {
        let err = run_config_from_forward(&forward_args(&["--min-change", "big"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`min_change`"));
    }

    #[test]
    fn both_flags_fail_when_the_search_starts() {
        let config =
            run_config_from_forward(&forward_args(&["--min-change", "0.5", "--max-features", "3"])).unwrap();
        let err = pipeline::run_selection(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`max_features` and `min_change`"));
    }
}
