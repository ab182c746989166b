//! Formatted terminal output for a selection run.
//!
//! Formatting lives here so the engine and the CLI stay free of layout code.

use crate::domain::{Direction, SelectionReport};

/// Describes where the data came from, for the summary header.
#[derive(Debug, Clone)]
pub struct DataSummary {
    pub source: String,
    pub n_train: usize,
    pub n_val: usize,
}

/// Format the full run summary: data, configuration, result and round table.
pub fn format_selection_summary(report: &SelectionReport, data: &DataSummary) -> String {
    let mut out = String::new();

    out.push_str("=== stepwise - greedy feature selection ===\n");
    out.push_str(&format!("Data: {}\n", data.source));
    out.push_str(&format!(
        "Rows: train={} | validation={} | features={}\n",
        data.n_train, data.n_val, report.total_features
    ));
    out.push_str(&format!(
        "Search: {} | criterion={} | model={}\n",
        direction_name(report.direction),
        report.criterion.display_name(),
        report.model
    ));

    out.push_str("\nRounds:\n");
    out.push_str(&format_rounds(report));

    out.push_str("\nSelected features:\n");
    for (idx, name) in report.selected.iter().zip(&report.selected_names) {
        out.push_str(&format!("- [{idx}] {name}\n"));
    }
    out.push_str(&format!(
        "{} on selected set: {:.6}\n",
        report.criterion.display_name(),
        report.final_score
    ));

    out
}

fn format_rounds(report: &SelectionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>6} {:>10} {:>16}\n", "round", "features", "score"));
    out.push_str(&format!("{:->6} {:->10} {:->16}\n", "", "", ""));
    for r in &report.rounds {
        let score = r.score.map(|s| format!("{s:.6}")).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("{:>6} {:>10} {:>16}\n", r.round, r.n_features, score));
    }
    out
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "forward selection",
        Direction::Backward => "backward elimination",
    }
}
