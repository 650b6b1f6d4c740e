//! CSV input and export
//!
//! Input: one job per row, the description in a named column and an optional
//! id column. Export: one flat row per batch record with the basic metrics,
//! summary counters and a `<category>_count` column per category.

use std::path::Path;

use serde::Serialize;

use jobreq_core::{JobReqError, RequirementCategory, Result};

use crate::{BatchItem, ItemOutcome};

/// Where a batch item came from (CSV input)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowInfo {
    /// 1-based data row (the header is not counted)
    pub row_number: usize,
    /// Value of the id column, or `Row_<n>` when absent or empty
    pub row_id: String,
}

/// One data row: its identity and the text to analyze, or why it is unusable
pub(crate) struct CsvRow {
    pub info: RowInfo,
    pub text: std::result::Result<String, String>,
}

/// Read every data row of a CSV file.
///
/// A missing file or text column fails the whole read; a malformed row is
/// returned as a row error.
pub(crate) fn read_rows(
    path: &Path,
    text_column: &str,
    id_column: Option<&str>,
) -> Result<Vec<CsvRow>> {
    if !path.is_file() {
        return Err(JobReqError::InvalidInput(format!(
            "CSV file {} does not exist",
            path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();

    let text_index = headers
        .iter()
        .position(|h| h.trim() == text_column)
        .ok_or_else(|| {
            JobReqError::InvalidInput(format!("column '{text_column}' not found in CSV"))
        })?;
    let id_index = id_column.and_then(|id| headers.iter().position(|h| h.trim() == id));
    if let (Some(id), None) = (id_column, id_index) {
        tracing::warn!(
            "Id column '{}' not found in {}; using row numbers",
            id,
            path.display()
        );
    }

    let rows = reader
        .records()
        .enumerate()
        .map(|(i, record)| {
            let row_number = i + 1;
            let fallback_id = || format!("Row_{row_number}");

            match record {
                Ok(record) => CsvRow {
                    info: RowInfo {
                        row_number,
                        row_id: id_index
                            .and_then(|idx| record.get(idx))
                            .map(str::trim)
                            .filter(|id| !id.is_empty())
                            .map(str::to_string)
                            .unwrap_or_else(fallback_id),
                    },
                    text: record
                        .get(text_index)
                        .map(str::to_string)
                        .ok_or_else(|| format!("row {row_number} has no '{text_column}' value")),
                },
                Err(e) => CsvRow {
                    info: RowInfo {
                        row_number,
                        row_id: fallback_id(),
                    },
                    text: Err(format!("malformed CSV row: {e}")),
                },
            }
        })
        .collect();

    Ok(rows)
}

/// Export columns filled from a successful analysis, before the category counts
const METRIC_COLUMNS: &[&str] = &[
    "text_length",
    "word_count",
    "complexity_score",
    "total_sentences",
    "requirement_sentences",
    "requirement_density",
    "estimated_requirements",
];

/// Column names of the flat export
pub fn export_header() -> Vec<String> {
    let mut header = vec!["source".to_string()];
    header.extend(METRIC_COLUMNS.iter().map(|s| s.to_string()));

    header.extend(
        RequirementCategory::ALL
            .iter()
            .map(|category| format!("{}_count", category.as_str())),
    );
    header.push("degraded".to_string());
    header.push("error".to_string());
    header
}

/// One export row; metric columns are empty for a failed record
pub fn export_row(item: &BatchItem) -> Vec<String> {
    let mut row = vec![item.source()];

    match &item.outcome {
        ItemOutcome::Analyzed(analysis) => {
            let summary = &analysis.requirements.summary;
            row.extend([
                analysis.text_length.to_string(),
                analysis.word_count.to_string(),
                analysis.complexity_score.to_string(),
                summary.total_sentences.to_string(),
                summary.requirement_sentences.to_string(),
                summary.requirement_density.to_string(),
                summary.estimated_requirements.to_string(),
            ]);
            row.extend(RequirementCategory::ALL.iter().map(|category| {
                analysis
                    .requirements
                    .categorized_requirements
                    .get(*category)
                    .len()
                    .to_string()
            }));
            row.push(analysis.is_degraded().to_string());
            row.push(String::new());
        }
        ItemOutcome::Failed { error } => {
            let blank = METRIC_COLUMNS.len() + RequirementCategory::ALL.len() + 1;
            row.extend(std::iter::repeat(String::new()).take(blank));
            row.push(error.clone());
        }
    }

    row
}

/// Write records as CSV with [`export_header`] columns
pub(crate) fn write_records(path: &Path, items: &[BatchItem]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;

    writer
        .write_record(export_header())
        .map_err(|e| csv_error(path, e))?;
    for item in items {
        writer
            .write_record(export_row(item))
            .map_err(|e| csv_error(path, e))?;
    }

    writer.flush().map_err(|e| JobReqError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path, error: csv::Error) -> JobReqError {
    let message = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(source) => JobReqError::Io {
            path: path.display().to_string(),
            source,
        },
        _ => JobReqError::InvalidInput(format!("CSV error in {}: {message}", path.display())),
    }
}
