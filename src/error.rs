// src/error.rs
use crate::pipeline::context::ExportState;
use crate::pipeline::sink::DeliveryError;
use quire_layout::LayoutError;
use quire_render_lopdf::SerializeError;
use thiserror::Error;

/// Fatal export failures. Recoverable problems (bad input, highlight
/// failures, unrenderable blocks) never reach this type; they are counted
/// in [`Diagnostics`](crate::pipeline::Diagnostics) instead.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("PDF serialization failed: {0}")]
    Serialize(#[from] SerializeError),

    #[error("Serializer failed: {0}")]
    Serializer(String),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Export was cancelled")]
    Cancelled,

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: ExportState,
        #[source]
        source: Box<ExportError>,
    },
}

impl ExportError {
    /// Tags this error with the stage it happened in. Already tagged errors
    /// keep their original stage.
    pub fn at(self, stage: ExportState) -> Self {
        match self {
            tagged @ ExportError::Stage { .. } => tagged,
            other => ExportError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    pub fn stage(&self) -> Option<ExportState> {
        match self {
            ExportError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The underlying error without its stage tag.
    pub fn root(&self) -> &ExportError {
        match self {
            ExportError::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), ExportError::Cancelled)
    }
}

impl From<tokio::task::JoinError> for ExportError {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_cancelled() {
            ExportError::Cancelled
        } else {
            ExportError::Serializer(format!("serializer task panicked: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_tag_is_applied_once() {
        let err = ExportError::Cancelled
            .at(ExportState::Serializing)
            .at(ExportState::Assembling);
        assert_eq!(err.stage(), Some(ExportState::Serializing));
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "serializing stage failed: Export was cancelled");
    }

    #[test]
    fn layout_errors_convert() {
        let err: ExportError = LayoutError::InvalidGeometry {
            width: -1.0,
            height: 10.0,
        }
        .into();
        assert!(matches!(err, ExportError::Layout(_)));
        assert_eq!(err.stage(), None);
    }
}
