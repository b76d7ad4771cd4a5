//! Export orchestration.
//!
//! - [`PdfExporter`]: runs one export through its stages
//! - [`ExportOptions`]: per-call settings, serde and builder friendly
//! - [`OutputSink`]: where the finished PDF goes
//! - [`DocumentSerializer`]: layout plus PDF writing, swappable
//!
//! # Example
//!
//! ```ignore
//! use quire::{ExportOptions, PdfExporter, FileSink};
//!
//! let mut sink = FileSink::new("out");
//! let outcome = PdfExporter::new()
//!     .export(raw_json, &ExportOptions::default(), &mut sink)
//!     .await?;
//! println!("{} pages", outcome.page_count);
//! ```

pub mod context;
pub mod options;
pub mod orchestrator;
pub mod serializer;
pub mod sink;

pub use context::{Diagnostics, ExportContext, ExportState};
pub use options::{ExportOptions, ExportOptionsBuilder};
pub use orchestrator::{export_document_to_pdf, DocumentSource, ExportOutcome, PdfExporter};
pub use serializer::{DocumentSerializer, LopdfSerializer, SerializedDocument};
pub use sink::{artifact_name, sanitize_file_name, Artifact, DeliveryError, FileSink, MemorySink, OutputSink, WriterSink};
