//! CSV ingest.
//!
//! Turns a headed CSV of numeric columns into a [`Dataset`]: one column is the
//! target, every other column is a feature (in header order).
//!
//! - **Strict schema**: the target column must exist (exit code 2)
//! - **Row-level validation**: rows that do not parse are skipped and reported
//! - **No selection logic here**

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use nalgebra::{DMatrix, DVector};

use crate::domain::Dataset;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the dataset plus what was skipped on the way.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a CSV file, using `target` as the label column.
pub fn load_dataset(path: &Path, target: &str) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_dataset(file, target)
}

/// Read a headed CSV from any reader.
pub fn read_dataset<R: Read>(input: R, target: &str) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let target_key = normalize_header_name(target);
    let Some(&target_idx) = header_map.get(&target_key) else {
        return Err(AppError::new(2, format!("Missing target column: `{target}`")));
    };

    let feature_idx: Vec<usize> = (0..headers.len()).filter(|&i| i != target_idx).collect();
    let feature_names: Vec<String> = feature_idx
        .iter()
        .map(|&i| clean_header_name(&headers[i]).to_string())
        .collect();

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<f64> = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, headers.len(), target_idx, &feature_idx, &headers) {
            Ok((features, label)) => {
                rows.push(features);
                labels.push(label);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = rows.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows remain after parsing."));
    }

    let x = DMatrix::from_fn(rows_used, feature_idx.len(), |i, j| rows[i][j]);
    let y = DVector::from_vec(labels);

    Ok(IngestedData {
        dataset: Dataset {
            feature_names,
            target_name: clean_header_name(&headers[target_idx]).to_string(),
            x,
            y,
        },
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn clean_header_name(name: &str) -> &str {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}')
}

fn normalize_header_name(name: &str) -> String {
    clean_header_name(name).to_ascii_lowercase()
}

fn parse_row(
    record: &StringRecord,
    width: usize,
    target_idx: usize,
    feature_idx: &[usize],
    headers: &StringRecord,
) -> Result<(Vec<f64>, f64), String> {
    if record.len() != width {
        return Err(format!("Expected {width} fields, found {}.", record.len()));
    }

    let cell = |i: usize| -> Result<f64, String> {
        let raw = record.get(i).unwrap_or("");
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(format!(
                "Missing/invalid `{}` value: '{raw}'.",
                clean_header_name(&headers[i])
            )),
        }
    };

    let label = cell(target_idx)?;
    let features = feature_idx.iter().map(|&i| cell(i)).collect::<Result<Vec<_>, _>>()?;
    Ok((features, label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_split_from_features() {
        let csv = "a,y,b\n1,10,2\n3,30,4\n";
        let ingest = read_dataset(csv.as_bytes(), "y").unwrap();
        let data = &ingest.dataset;
        assert_eq!(data.feature_names, vec!["a", "b"]);
        assert_eq!(data.target_name, "y");
        assert_eq!(data.x, DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(data.y, DVector::from_row_slice(&[10.0, 30.0]));
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let csv = "\u{feff}X1,x2,Target\n1,2,3\n1,,3\n4,5,nan\n6,7\n8,9,10\n";
        let ingest = read_dataset(csv.as_bytes(), "target").unwrap();
        assert_eq!(ingest.rows_read, 5);
        assert_eq!(ingest.rows_used, 2);
        let lines: Vec<usize> = ingest.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert_eq!(ingest.dataset.feature_names, vec!["X1", "x2"]);
        assert_eq!(ingest.dataset.y, DVector::from_row_slice(&[3.0, 10.0]));
    }

    #[test]
    fn missing_target_is_a_schema_error() {
        let err = read_dataset("a,b\n1,2\n".as_bytes(), "y").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`y`"));
    }

    #[test]
    fn no_usable_rows_is_an_error() {
        let err = read_dataset("a,y\nfoo,1\n".as_bytes(), "y").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
