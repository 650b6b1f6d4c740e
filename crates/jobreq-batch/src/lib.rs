//! JobReq Batch - Batch analysis of job descriptions
//!
//! Runs the extraction pipeline over many files, CSV rows or texts, keeps one
//! record per item (a failed item carries its error instead of a result),
//! persists the records as a JSON array or a flat CSV and summarizes them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use jobreq_core::{AnalysisResult, ExtractionConfig, JobReqError, Result};
use jobreq_extractor::RequirementsExtractor;
use jobreq_reader::ReaderRegistry;

pub mod csv_io;
pub mod report;

pub use csv_io::RowInfo;
pub use report::{AggregateMetrics, BatchSummary, RequirementsTotals};

/// Extensions processed when none are given
pub const DEFAULT_EXTENSIONS: &[&str] = &["txt", "md"];

/// CSV column read when none is given
pub const DEFAULT_TEXT_COLUMN: &str = "description";

// ============================================================================
// Batch Records
// ============================================================================

/// Where a batch item came from (file input)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub file_path: String,
    /// Characters of text read; absent when reading failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<usize>,
}

impl FileInfo {
    fn for_path(path: &Path) -> Self {
        Self {
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file_path: path.display().to_string(),
            file_size: None,
        }
    }
}

/// Where a batch item came from (raw text input)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextInfo {
    /// Position in the submitted list
    pub index: usize,
}

/// Analysis result or the error that prevented it
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ItemOutcome {
    Analyzed(Box<AnalysisResult>),
    Failed { error: String },
}

/// One record of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    #[serde(flatten)]
    pub outcome: ItemOutcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_info: Option<TextInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_info: Option<RowInfo>,
}

impl BatchItem {
    /// The analysis, if the item succeeded
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            ItemOutcome::Analyzed(result) => Some(result),
            ItemOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ItemOutcome::Analyzed(_) => None,
            ItemOutcome::Failed { error } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.analysis().is_some()
    }

    /// File path, CSV row id or `text_<index>`, whichever the item has
    pub fn source(&self) -> String {
        if let Some(file) = &self.file_info {
            file.file_path.clone()
        } else if let Some(row) = &self.row_info {
            row.row_id.clone()
        } else if let Some(text) = &self.text_info {
            format!("text_{}", text.index)
        } else {
            String::new()
        }
    }

    fn outcome(result: Result<AnalysisResult>) -> ItemOutcome {
        match result {
            Ok(analysis) => ItemOutcome::Analyzed(Box::new(analysis)),
            Err(e) => ItemOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

// ============================================================================
// Batch Processor
// ============================================================================

/// Runs the extractor over many inputs and keeps the records of the last run
pub struct BatchProcessor {
    extractor: Arc<RequirementsExtractor>,
    readers: ReaderRegistry,
    limits: ExtractionConfig,
    parallel: bool,
    results: Vec<BatchItem>,
}

impl BatchProcessor {
    /// Create a processor sharing an extractor
    pub fn new(extractor: Arc<RequirementsExtractor>, limits: ExtractionConfig) -> Self {
        Self {
            extractor,
            readers: ReaderRegistry::with_defaults(),
            limits,
            parallel: false,
            results: Vec::new(),
        }
    }

    /// Process items on the rayon thread pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Records of the last run
    pub fn results(&self) -> &[BatchItem] {
        &self.results
    }

    /// Take the records of the last run
    pub fn into_results(self) -> Vec<BatchItem> {
        self.results
    }

    /// Read and analyze one file; failures are captured in the record
    pub fn process_file(&self, path: &Path) -> BatchItem {
        let mut file_info = FileInfo::for_path(path);

        let result = self
            .readers
            .read(path)
            .map_err(|e| JobReqError::InvalidInput(e.to_string()))
            .and_then(|doc| {
                file_info.file_size = Some(doc.char_count());
                self.analyze(&doc.text)
            });

        if let Err(e) = &result {
            tracing::warn!("Failed to process {}: {}", path.display(), e);
        }

        BatchItem {
            outcome: BatchItem::outcome(result),
            file_info: Some(file_info),
            text_info: None,
            row_info: None,
        }
    }

    /// Process every file in a directory whose extension is listed.
    ///
    /// Files are visited in path order; the directory itself must exist.
    pub fn process_directory(
        &mut self,
        directory: &Path,
        extensions: &[&str],
    ) -> Result<&[BatchItem]> {
        if !directory.is_dir() {
            return Err(JobReqError::InvalidInput(format!(
                "directory {} does not exist",
                directory.display()
            )));
        }

        let files = collect_files(directory, extensions)?;
        tracing::info!("Found {} files to process", files.len());

        self.results = if self.parallel {
            files.par_iter().map(|path| self.process_file(path)).collect()
        } else {
            files
                .iter()
                .enumerate()
                .map(|(i, path)| {
                    tracing::info!("Processing {}/{}: {}", i + 1, files.len(), path.display());
                    self.process_file(path)
                })
                .collect()
        };

        Ok(&self.results)
    }

    /// Analyze a list of raw texts
    pub fn process_texts<S: AsRef<str> + Sync>(&mut self, texts: &[S]) -> &[BatchItem] {
        let process = |(index, text): (usize, &S)| BatchItem {
            outcome: BatchItem::outcome(self.analyze(text.as_ref())),
            file_info: None,
            text_info: Some(TextInfo { index }),
            row_info: None,
        };

        self.results = if self.parallel {
            texts.par_iter().enumerate().map(process).collect()
        } else {
            texts.iter().enumerate().map(process).collect()
        };

        tracing::info!("Processed {} texts", self.results.len());
        &self.results
    }

    /// Analyze the `text_column` of every row of a CSV file.
    ///
    /// Rows are kept in file order; `id_column` names the rows in the records.
    /// A missing file or text column fails the call, a bad row fails its record.
    pub fn process_csv(
        &mut self,
        path: &Path,
        text_column: &str,
        id_column: Option<&str>,
    ) -> Result<&[BatchItem]> {
        let rows = csv_io::read_rows(path, text_column, id_column)?;
        tracing::info!("Found {} rows in {}", rows.len(), path.display());

        let process = |row: csv_io::CsvRow| {
            let result = row
                .text
                .map_err(JobReqError::InvalidInput)
                .and_then(|text| self.analyze(&text));
            if let Err(e) = &result {
                tracing::warn!("Failed to process row {}: {}", row.info.row_id, e);
            }

            BatchItem {
                outcome: BatchItem::outcome(result),
                file_info: None,
                text_info: None,
                row_info: Some(row.info),
            }
        };

        self.results = if self.parallel {
            rows.into_par_iter().map(process).collect()
        } else {
            rows.into_iter().map(process).collect()
        };

        Ok(&self.results)
    }

    /// Write the records of the last run as a pretty JSON array
    pub fn save_results(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.results)?;
        std::fs::write(path, json).map_err(|e| JobReqError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        tracing::info!("Results saved to {}", path.display());
        Ok(())
    }

    /// Write the records of the last run as a flat CSV, one row per record
    pub fn save_results_csv(&self, path: &Path) -> Result<()> {
        csv_io::write_records(path, &self.results)?;
        tracing::info!("Results saved to {}", path.display());
        Ok(())
    }

    /// Summary of the last run (`None` before anything was processed)
    pub fn summary_report(&self) -> Option<BatchSummary> {
        BatchSummary::from_items(&self.results)
    }

    fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        self.limits.check_length(text)?;
        self.extractor.extract_requirements(text)
    }
}

/// Files directly inside `directory` with a listed extension, sorted
fn collect_files(directory: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let io_error = |e| JobReqError::Io {
        path: directory.display().to_string(),
        source: e,
    };

    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| wanted.contains(&e.to_lowercase()));

        if path.is_file() && matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
