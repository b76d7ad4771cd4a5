//! PDF serializer for laid-out documents.
//!
//! Pages are drawn with the eight standard Type1 fonts so no font program is
//! embedded. Every text show carries an `/ActualText` span holding the
//! original Unicode string, which keeps characters outside WinAnsi
//! recoverable from the artifact.

mod encoding;
mod page;
mod renderer;
mod writer;

pub use encoding::{encode_win_ansi, text_string};
pub use renderer::{LopdfRenderer, PdfMetadata};
pub use writer::StreamingPdfWriter;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("I/O error while writing PDF: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode content stream for page {page}: {message}")]
    Content { page: usize, message: String },
    #[error("Image data does not match its dimensions ({width}x{height}, {len} bytes)")]
    InvalidImage { width: u32, height: u32, len: usize },
}
