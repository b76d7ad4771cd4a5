//! Canonical block document model and the tolerant normalizer that builds it
//! from whatever shape the editor persisted.

pub mod block;
pub mod document;
mod encode;
pub mod error;
pub mod legacy;
pub mod normalize;

pub use block::{
    Block, BlockKind, ImageProps, MAX_TABLE_COLUMNS, TableCell, TableContent, TableRow, TextAlignment,
    TextRun, TextStyles,
};
pub use document::{Document, DocumentMetadata};
pub use error::InputError;
pub use normalize::{NormalizeReport, Normalized, SourceShape, normalize_document, normalize_value};
