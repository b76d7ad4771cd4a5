use thiserror::Error;

/// Problems with the stored document shape. The normalizer always recovers
/// from these by substituting a placeholder document; they surface only in
/// the [`NormalizeReport`](crate::NormalizeReport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("no document was supplied")]
    Missing,

    #[error("document has neither a title nor any content")]
    NoTitleOrContent,

    #[error("unrecognized document shape: {0}")]
    UnrecognizedShape(String),
}
