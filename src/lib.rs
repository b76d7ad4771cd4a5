//! Block document to PDF export.
//!
//! A stored editor document is normalized, its code blocks highlighted,
//! each block rendered to layout content, the whole assembled with page
//! furniture, paginated and written as PDF.

pub mod assemble;
pub mod error;
pub mod pipeline;
pub mod render;

pub use error::ExportError;
pub use pipeline::{
    export_document_to_pdf, Artifact, DeliveryError, Diagnostics, DocumentSerializer, DocumentSource,
    ExportOptions, ExportOutcome, ExportState, FileSink, LopdfSerializer, MemorySink, OutputSink, PdfExporter,
    WriterSink,
};
pub use render::{BlockRenderer, DirectoryImageProvider, ImageProvider, MemoryImageProvider, RenderedBlock};

pub use quire_highlight::{Highlighter, RegexHighlighter, ThemeKind};
pub use quire_model::{Block, BlockKind, Document, DocumentMetadata, TextRun, TextStyles};
pub use quire_types::{Margins, PageFormat};
