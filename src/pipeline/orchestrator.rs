// src/pipeline/orchestrator.rs
use crate::assemble::assemble;
use crate::error::ExportError;
use crate::pipeline::context::{Diagnostics, ExportContext, ExportState};
use crate::pipeline::options::ExportOptions;
use crate::pipeline::serializer::{DocumentSerializer, LopdfSerializer};
use crate::pipeline::sink::{artifact_name, Artifact, MemorySink, OutputSink};
use crate::render::{BlockRenderer, ImageProvider, RenderOutput};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use quire_highlight::{
    highlight_or_plain, plain_lines, CacheKey, Highlighted, HighlightError, Highlighter, RegexHighlighter, Theme,
    TokenCache,
};
use quire_layout::PageSetup;
use quire_model::{normalize_document, normalize_value, Block, BlockKind, Document};
use quire_render_lopdf::PdfMetadata;
use quire_types::BlockId;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// What to export: a stored JSON value in any supported shape, an already
/// typed document, or nothing at all (exports a placeholder).
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Raw(Value),
    Typed(Document),
    Missing,
}

impl From<Value> for DocumentSource {
    fn from(value: Value) -> Self {
        DocumentSource::Raw(value)
    }
}

impl From<Document> for DocumentSource {
    fn from(document: Document) -> Self {
        DocumentSource::Typed(document)
    }
}

impl From<Option<Value>> for DocumentSource {
    fn from(value: Option<Value>) -> Self {
        value.map_or(DocumentSource::Missing, DocumentSource::Raw)
    }
}

#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Blocks as rendered, before layout.
    pub rendered: RenderOutput,
    pub diagnostics: Diagnostics,
    pub history: Vec<ExportState>,
}

/// Runs exports. Holds only injected, read-only collaborators; every call
/// creates its own [`ExportContext`], theme and token cache.
#[derive(Clone)]
pub struct PdfExporter {
    highlighter: Arc<dyn Highlighter>,
    images: Option<Arc<dyn ImageProvider>>,
    serializer: Arc<dyn DocumentSerializer>,
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExporter {
    /// The built-in highlighter and lopdf serializer, no image provider.
    pub fn new() -> Self {
        Self {
            highlighter: Arc::new(RegexHighlighter::new()),
            images: None,
            serializer: Arc::new(LopdfSerializer::default()),
        }
    }

    pub fn with_highlighter(mut self, highlighter: Arc<dyn Highlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn with_image_provider(mut self, images: Arc<dyn ImageProvider>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn DocumentSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Exports one document and delivers it to `sink`. On error nothing has
    /// been delivered.
    pub async fn export(
        &self,
        source: impl Into<DocumentSource>,
        options: &ExportOptions,
        sink: &mut dyn OutputSink,
    ) -> Result<ExportOutcome, ExportError> {
        let mut ctx = ExportContext::new();
        match self.run(source.into(), options, sink, &mut ctx).await {
            Ok((artifact, page_count, rendered)) => {
                ctx.diagnostics.page_count = page_count;
                ctx.transition(ExportState::Succeeded);
                let (history, diagnostics) = ctx.into_parts();
                Ok(ExportOutcome {
                    file_name: artifact.file_name,
                    bytes: artifact.bytes,
                    page_count,
                    rendered,
                    diagnostics,
                    history,
                })
            }
            Err(e) => {
                let e = e.at(ctx.state());
                error!("{}", e);
                ctx.transition(ExportState::Failed);
                Err(e)
            }
        }
    }

    /// Like [`export`](Self::export) but reports through callbacks. Exactly
    /// one of them is invoked, exactly once.
    pub async fn export_with_callbacks<S, E>(
        &self,
        source: impl Into<DocumentSource>,
        options: &ExportOptions,
        sink: &mut dyn OutputSink,
        on_success: S,
        on_error: E,
    ) where
        S: FnOnce(ExportOutcome),
        E: FnOnce(ExportError),
    {
        match self.export(source, options, sink).await {
            Ok(outcome) => on_success(outcome),
            Err(e) => on_error(e),
        }
    }

    async fn run(
        &self,
        source: DocumentSource,
        options: &ExportOptions,
        sink: &mut dyn OutputSink,
        ctx: &mut ExportContext,
    ) -> Result<(Artifact, usize, RenderOutput), ExportError> {
        ctx.transition(ExportState::Normalizing);
        let normalized = match source {
            DocumentSource::Raw(value) => normalize_value(Some(&value)),
            DocumentSource::Typed(document) => normalize_document(document),
            DocumentSource::Missing => normalize_value(None),
        };
        ctx.diagnostics.record_normalization(&normalized.report);
        let document = normalized.document;
        debug!("Normalized '{}' with {} blocks", document.title, document.block_count());

        ctx.transition(ExportState::Highlighting);
        let theme = Theme::from_kind(options.theme);
        let highlighted = self
            .highlight_all(&document, &theme, options.highlight_timeout(), &mut ctx.diagnostics)
            .await;

        ctx.transition(ExportState::Rendering);
        let content_width = PageSetup::new(options.page_format, options.margins).content_width().max(0.0);
        let rendered = BlockRenderer::new(&theme, content_width, &highlighted)
            .with_images(self.images.as_deref())
            .render(&document.content);
        ctx.diagnostics.rendered_blocks = rendered.flatten().len();
        ctx.diagnostics.degraded_blocks = rendered.degraded_blocks;
        ctx.diagnostics.image_placeholders = rendered.image_placeholders;

        ctx.transition(ExportState::Assembling);
        let generated_at = options.generated_at.unwrap_or_else(Utc::now);
        let flow = assemble(&document, &rendered, options, generated_at);

        ctx.transition(ExportState::Serializing);
        let serialized = self.serializer.serialize(flow, pdf_metadata(&document, generated_at)).await?;
        let artifact = Artifact {
            file_name: artifact_name(options.file_name.as_deref(), &document.title, &document.id),
            bytes: serialized.bytes,
        };
        sink.deliver(&artifact).await?;
        info!(
            "Exported '{}' as {} ({} pages, {} bytes)",
            document.title,
            artifact.file_name,
            serialized.page_count,
            artifact.bytes.len()
        );
        Ok((artifact, serialized.page_count, rendered))
    }

    /// Highlights every code block concurrently. Identical blocks are
    /// highlighted once. The result is keyed by block id, so completion order
    /// has no effect on the output.
    async fn highlight_all(
        &self,
        document: &Document,
        theme: &Theme,
        timeout: Duration,
        diagnostics: &mut Diagnostics,
    ) -> HashMap<BlockId, Highlighted> {
        let mut code_blocks = Vec::new();
        collect_code_blocks(&document.content, &mut code_blocks);
        diagnostics.code_blocks = code_blocks.len();
        if code_blocks.is_empty() {
            return HashMap::new();
        }

        let keys: Vec<CacheKey> = code_blocks
            .iter()
            .map(|(_, code, language)| CacheKey::new(code, language, theme.kind))
            .collect();

        let mut tasks = JoinSet::new();
        let mut queued = HashMap::new();
        for (index, key) in keys.iter().enumerate() {
            if queued.contains_key(key) {
                continue;
            }
            queued.insert(key.clone(), index);
            let highlighter = Arc::clone(&self.highlighter);
            let theme = theme.clone();
            let key = key.clone();
            tasks.spawn(async move {
                let result = highlight_or_plain(highlighter.as_ref(), &key.code, &key.language, &theme, timeout).await;
                (index, key, result)
            });
        }
        diagnostics.highlight_cache_hits = keys.len() - queued.len();

        let mut finished = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, key, result)) => {
                    finished.insert(index, (key, result));
                }
                Err(e) => warn!("Highlight task did not finish: {}", e),
            }
        }
        let mut cache = TokenCache::new();
        for (key, result) in finished.into_values() {
            cache.insert(key, result);
        }

        let mut highlighted = HashMap::with_capacity(code_blocks.len());
        for ((id, code, _), key) in code_blocks.into_iter().zip(keys) {
            let result = cache.get(&key).cloned().unwrap_or_else(|| Highlighted {
                lines: plain_lines(&code, theme),
                fallback: Some(HighlightError::Tokenizer("highlight task did not finish".to_string())),
            });
            if let Some(reason) = &result.fallback {
                debug!("Block {} uses plain text: {}", id, reason);
                diagnostics.highlight_fallbacks += 1;
            }
            highlighted.insert(id.clone(), result);
        }
        highlighted
    }
}

/// Code blocks in reading order as (id, source, language).
fn collect_code_blocks<'a>(blocks: &'a [Block], out: &mut Vec<(&'a BlockId, String, &'a str)>) {
    for block in blocks {
        if let BlockKind::CodeBlock { language } = &block.kind {
            out.push((&block.id, block.plain_text(), language.as_str()));
        }
        collect_code_blocks(&block.children, out);
    }
}

fn pdf_metadata(document: &Document, generated_at: DateTime<Utc>) -> PdfMetadata {
    let metadata = document.metadata.as_ref();
    PdfMetadata {
        title: document.title.clone(),
        author: metadata.and_then(|m| m.author.clone()),
        subject: metadata.and_then(|m| m.category.clone()),
        keywords: metadata.map(|m| m.tags.iter().cloned().collect()).unwrap_or_default(),
        creator: Some("quire".to_string()),
        created_at: Some(generated_at),
    }
}

/// Exports with the default collaborators into memory.
pub async fn export_document_to_pdf(
    source: impl Into<DocumentSource>,
    options: &ExportOptions,
) -> Result<ExportOutcome, ExportError> {
    let mut sink = MemorySink::new();
    PdfExporter::new().export(source, options, &mut sink).await
}
