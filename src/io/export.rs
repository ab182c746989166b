//! Export a selection report to JSON.
//!
//! The file wraps the [`SelectionReport`] with the tool name and a UTC
//! timestamp so exports from different runs can be told apart.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SelectionReport;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub report: SelectionReport,
}

impl ReportFile {
    pub fn new(report: SelectionReport) -> Self {
        Self {
            tool: "stepwise".to_string(),
            generated_at: Utc::now(),
            report,
        }
    }
}

/// Write a selection report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &SelectionReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &ReportFile::new(report.clone()))
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

/// Read a report JSON file written by [`write_report_json`].
pub fn read_report_json(path: &Path) -> Result<ReportFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))
}
