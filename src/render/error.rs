use thiserror::Error;

/// Block-level problems. None of them abort an export; the renderer degrades
/// the block and counts it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Unsupported block type '{0}'")]
    UnsupportedBlock(String),
    #[error("Table has no cells")]
    EmptyTable,
    #[error("Table spans {columns} columns; at most {max} can be drawn")]
    TableTooWide { columns: usize, max: usize },
    #[error("Image '{url}' is unavailable: {reason}")]
    ImageUnavailable { url: String, reason: String },
}
