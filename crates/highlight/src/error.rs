use std::time::Duration;
use thiserror::Error;

/// Highlighting failures. All of them are recoverable: the caller falls back
/// to plain text for the affected block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    #[error("unsupported language: '{0}'")]
    UnsupportedLanguage(String),

    #[error("tokenizer failed: {0}")]
    Tokenizer(String),

    #[error("highlighting timed out after {0:?}")]
    Timeout(Duration),
}
