//! DOCX reader using docx-rs
//!
//! Paragraphs become lines; each table row becomes one line with its cell
//! texts joined by " | ".

use std::path::Path;

use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent};

use crate::{read_bytes, DocumentFormat, DocumentReader, JobDocument, ReaderError, Result};

/// DOCX document reader
pub struct DocxReader {
    /// Keep table rows in the extracted text
    pub include_tables: bool,
}

impl DocxReader {
    /// Create a new DOCX reader with default settings
    pub fn new() -> Self {
        Self {
            include_tables: true,
        }
    }

    /// Enable or disable table extraction
    pub fn with_tables(mut self, enabled: bool) -> Self {
        self.include_tables = enabled;
        self
    }

    /// Extract text from DOCX bytes
    pub fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let docx = read_docx(bytes).map_err(|e| ReaderError::DocxError(e.to_string()))?;

        let mut lines: Vec<String> = Vec::new();

        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(para) => {
                    lines.push(paragraph_text(para));
                }
                DocumentChild::Table(tbl) if self.include_tables => {
                    for row in &tbl.rows {
                        let docx_rs::TableChild::TableRow(tr) = row;

                        let cells: Vec<String> = tr
                            .cells
                            .iter()
                            .map(|cell| {
                                let docx_rs::TableRowChild::TableCell(tc) = cell;
                                tc.children
                                    .iter()
                                    .filter_map(|content| match content {
                                        TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                                        _ => None,
                                    })
                                    .collect::<Vec<_>>()
                                    .join(" ")
                                    .trim()
                                    .to_string()
                            })
                            .filter(|cell| !cell.is_empty())
                            .collect();

                        if !cells.is_empty() {
                            lines.push(cells.join(" | "));
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(lines.join("\n").trim().to_string())
    }
}

/// Concatenate the text runs of a paragraph
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

impl Default for DocxReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentReader for DocxReader {
    fn read(&self, path: &Path) -> Result<JobDocument> {
        let bytes = read_bytes(path)?;
        let text = self.extract_text(&bytes)?;

        Ok(JobDocument::new(
            path.display().to_string(),
            DocumentFormat::Docx,
            text,
        ))
    }

    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Docx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Run};

    fn write_docx(paragraphs: &[&str]) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();

        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        docx.build().pack(file.reopen().unwrap()).unwrap();

        file
    }

    #[test]
    fn test_supported_formats() {
        let reader = DocxReader::new();
        assert!(reader.can_read(DocumentFormat::Docx));
        assert!(!reader.can_read(DocumentFormat::PlainText));
        assert!(!reader.with_tables(false).include_tables);
    }

    #[test]
    fn test_read_paragraphs() {
        let file = write_docx(&[
            "Backend Engineer",
            "Bachelor's degree in Computer Science required",
        ]);

        let doc = DocxReader::new().read(file.path()).unwrap();
        assert_eq!(doc.format, DocumentFormat::Docx);
        assert_eq!(
            doc.text,
            "Backend Engineer\nBachelor's degree in Computer Science required"
        );
    }

    #[test]
    fn test_not_a_docx() {
        let err = DocxReader::new().extract_text(b"plain text").unwrap_err();
        assert!(matches!(err, ReaderError::DocxError(_)));
    }
}
