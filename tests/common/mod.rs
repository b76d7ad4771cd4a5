#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use chrono::{TimeZone, Utc};
use lopdf::Document as LopdfDocument;
use quire::{export_document_to_pdf, DocumentSource, ExportError, ExportOptions, ExportOutcome};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// Options with a pinned generation time, so output is reproducible.
pub fn fixed_options() -> ExportOptions {
    ExportOptions::builder()
        .with_generated_at(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
        .build()
}

pub async fn export(source: impl Into<DocumentSource>, options: &ExportOptions) -> Result<ExportOutcome, ExportError> {
    export_document_to_pdf(source, options).await
}

/// Exports with the default collaborators and loads the result.
pub async fn export_pdf(
    source: impl Into<DocumentSource>,
    options: &ExportOptions,
) -> Result<(ExportOutcome, GeneratedPdf), Box<dyn std::error::Error>> {
    let outcome = export(source, options).await?;
    let pdf = GeneratedPdf::from_bytes(outcome.bytes.clone())?;
    Ok((outcome, pdf))
}
