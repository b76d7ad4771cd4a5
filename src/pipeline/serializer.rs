use crate::error::ExportError;
use async_trait::async_trait;
use log::debug;
use quire_layout::{FlowDocument, LayoutEngine};
use quire_render_lopdf::{LopdfRenderer, PdfMetadata};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Turns an assembled flow into PDF bytes. Layout (page breaking) happens
/// behind this seam so alternative backends can own it.
#[async_trait]
pub trait DocumentSerializer: Send + Sync {
    async fn serialize(&self, document: FlowDocument, metadata: PdfMetadata) -> Result<SerializedDocument, ExportError>;
}

/// Paginates with [`LayoutEngine`] and writes with [`LopdfRenderer`] on the
/// blocking pool.
#[derive(Debug, Clone, Default)]
pub struct LopdfSerializer {
    engine: LayoutEngine,
    renderer: LopdfRenderer,
}

impl LopdfSerializer {
    pub fn new(engine: LayoutEngine) -> Self {
        Self {
            engine,
            renderer: LopdfRenderer::new(),
        }
    }

    /// Synchronous form, for callers already off the async runtime.
    pub fn serialize_blocking(
        &self,
        document: &FlowDocument,
        metadata: &PdfMetadata,
    ) -> Result<SerializedDocument, ExportError> {
        let laid_out = self.engine.layout(document)?;
        debug!("Laid out {} blocks on {} pages", document.blocks.len(), laid_out.page_count());
        let bytes = self.renderer.render(&laid_out, metadata)?;
        Ok(SerializedDocument {
            bytes,
            page_count: laid_out.page_count(),
        })
    }
}

#[async_trait]
impl DocumentSerializer for LopdfSerializer {
    async fn serialize(&self, document: FlowDocument, metadata: PdfMetadata) -> Result<SerializedDocument, ExportError> {
        let serializer = self.clone();
        tokio::task::spawn_blocking(move || serializer.serialize_blocking(&document, &metadata)).await?
    }
}
