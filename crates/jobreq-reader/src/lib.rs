//! JobReq Reader - Job-description document reading
//!
//! Supports reading of:
//! - Plain text files (`.txt`)
//! - Markdown files (`.md`)
//! - Microsoft Word (`.docx`)
//!
//! Each reader implements the `DocumentReader` trait and produces a
//! `JobDocument` holding the text handed to the extractor.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod docx;

pub use docx::DocxReader;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while reading a document
#[derive(Error, Debug)]
pub enum ReaderError {
    /// File format is not supported
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// DOCX parsing error
    #[error("DOCX parsing error: {0}")]
    DocxError(String),

    /// File is not valid UTF-8 text
    #[error("Text encoding error in {0}: expected UTF-8")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, ReaderError>;

// ============================================================================
// Document Types
// ============================================================================

/// Accepted file extensions, without the dot
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "docx"];

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    PlainText,
    Markdown,
    Docx,
    Unknown,
}

impl DocumentFormat {
    /// Detect format from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "txt" => Self::PlainText,
            "md" | "markdown" => Self::Markdown,
            "docx" => Self::Docx,
            _ => Self::Unknown,
        }
    }

    /// Detect format from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText => write!(f, "text"),
            Self::Markdown => write!(f, "markdown"),
            Self::Docx => write!(f, "docx"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Text read from one job-description file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDocument {
    /// Source file path
    pub path: String,

    /// Detected format
    pub format: DocumentFormat,

    /// Extracted text
    pub text: String,
}

impl JobDocument {
    pub fn new(path: impl Into<String>, format: DocumentFormat, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format,
            text: text.into(),
        }
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

// ============================================================================
// Reader Trait
// ============================================================================

/// Trait for document readers
pub trait DocumentReader: Send + Sync {
    /// Read a document from a file path
    fn read(&self, path: &Path) -> Result<JobDocument>;

    /// Get supported formats
    fn supported_formats(&self) -> &[DocumentFormat];

    /// Check if this reader can handle a format
    fn can_read(&self, format: DocumentFormat) -> bool {
        self.supported_formats().contains(&format)
    }
}

/// Read a whole file into memory
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| ReaderError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

// ============================================================================
// Plain Text Reader
// ============================================================================

/// Reader for `.txt` and `.md` files (markdown is kept as-is)
pub struct PlainTextReader;

impl DocumentReader for PlainTextReader {
    fn read(&self, path: &Path) -> Result<JobDocument> {
        let bytes = read_bytes(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ReaderError::EncodingError(path.display().to_string()))?;

        // Drop a UTF-8 byte order mark left by some editors
        let text = text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text);

        Ok(JobDocument::new(
            path.display().to_string(),
            DocumentFormat::from_path(path),
            text,
        ))
    }

    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::PlainText, DocumentFormat::Markdown]
    }
}

// ============================================================================
// Reader Registry
// ============================================================================

/// Registry of available readers
pub struct ReaderRegistry {
    readers: Vec<Box<dyn DocumentReader>>,
}

impl ReaderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    /// Registry with the text and docx readers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PlainTextReader);
        registry.register(DocxReader::new());
        registry
    }

    /// Register a reader
    pub fn register<R: DocumentReader + 'static>(&mut self, reader: R) {
        self.readers.push(Box::new(reader));
    }

    /// Find a reader for a format
    pub fn find_reader(&self, format: DocumentFormat) -> Option<&dyn DocumentReader> {
        self.readers
            .iter()
            .find(|r| r.can_read(format))
            .map(|r| r.as_ref())
    }

    /// Read a file using the appropriate reader
    pub fn read(&self, path: &Path) -> Result<JobDocument> {
        let format = DocumentFormat::from_path(path);

        if format == DocumentFormat::Unknown {
            return Err(ReaderError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none")
                    .to_string(),
            ));
        }

        let reader = self
            .find_reader(format)
            .ok_or_else(|| ReaderError::UnsupportedFormat(format.to_string()))?;

        tracing::debug!("Reading {} as {}", path.display(), format);
        reader.read(path)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Read a job description with the default readers
pub fn read_document(path: impl AsRef<Path>) -> Result<JobDocument> {
    ReaderRegistry::with_defaults().read(path.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
