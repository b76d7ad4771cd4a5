mod common;

use async_trait::async_trait;
use common::fixtures::*;
use common::{fixed_options, TestResult};
use quire::pipeline::{DocumentSerializer, SerializedDocument};
use quire::{Document, ExportError, ExportOptions, ExportState, Highlighter, MemorySink, PdfExporter, RegexHighlighter};
use quire_highlight::{HighlightError, HighlightedLine, Theme};
use quire_layout::{FlowContent, FlowDocument};
use quire_render_lopdf::PdfMetadata;
use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

/// Delays each block by an amount that shrinks with its index, so later
/// blocks finish first.
struct ReverseLatencyHighlighter {
    blocks: u64,
}

#[async_trait]
impl Highlighter for ReverseLatencyHighlighter {
    async fn highlight(&self, code: &str, language: &str, theme: &Theme) -> Result<Vec<HighlightedLine>, HighlightError> {
        let index: u64 = code
            .split(|c: char| !c.is_ascii_digit())
            .find(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        tokio::time::sleep(Duration::from_millis((self.blocks - index) * 5)).await;
        RegexHighlighter::new().highlight(code, language, theme).await
    }
}

/// Never finishes.
struct StalledHighlighter;

#[async_trait]
impl Highlighter for StalledHighlighter {
    async fn highlight(&self, _: &str, _: &str, _: &Theme) -> Result<Vec<HighlightedLine>, HighlightError> {
        std::future::pending().await
    }
}

struct FailingSerializer;

#[async_trait]
impl DocumentSerializer for FailingSerializer {
    async fn serialize(&self, _: FlowDocument, _: PdfMetadata) -> Result<SerializedDocument, ExportError> {
        Err(ExportError::Serializer("disk full".to_string()))
    }
}

struct PanickingSerializer;

#[async_trait]
impl DocumentSerializer for PanickingSerializer {
    async fn serialize(&self, _: FlowDocument, _: PdfMetadata) -> Result<SerializedDocument, ExportError> {
        tokio::task::spawn_blocking(|| -> Result<SerializedDocument, ExportError> { panic!("writer exploded") }).await?
    }
}

#[tokio::test]
async fn rendered_order_matches_input_despite_completion_order() -> TestResult {
    let blocks = 8;
    let doc = Document::new("c", "Code", code_blocks(blocks));
    let exporter = PdfExporter::new().with_highlighter(Arc::new(ReverseLatencyHighlighter { blocks: blocks as u64 }));

    let mut sink = MemorySink::new();
    let outcome = exporter.export(doc.clone(), &fixed_options(), &mut sink).await?;

    let sources: Vec<String> = outcome
        .rendered
        .flatten()
        .iter()
        .map(|b| match &b.element {
            FlowContent::Code(code) => code.lines[0].iter().map(|s| s.text.as_str()).collect(),
            _ => String::new(),
        })
        .collect();
    let expected: Vec<String> = (0..blocks).map(|i| format!("fn block_{}() -> u32 {{ {} }}", i, i)).collect();
    assert_eq!(sources, expected);
    assert_eq!(outcome.diagnostics.highlight_fallbacks, 0);

    // Same bytes as the undelayed highlighter.
    let mut plain_sink = MemorySink::new();
    let baseline = PdfExporter::new().export(doc, &fixed_options(), &mut plain_sink).await?;
    assert_eq!(outcome.bytes, baseline.bytes);
    Ok(())
}

#[tokio::test]
async fn slow_highlighting_times_out_to_plain_text() -> TestResult {
    let options = ExportOptions {
        highlight_timeout_ms: 20,
        ..fixed_options()
    };
    let exporter = PdfExporter::new().with_highlighter(Arc::new(StalledHighlighter));
    let mut sink = MemorySink::new();
    let outcome = exporter.export(demo_document(), &options, &mut sink).await?;
    assert_eq!(outcome.diagnostics.highlight_fallbacks, 1);
    assert_eq!(sink.artifacts().len(), 1);
    Ok(())
}

#[tokio::test]
async fn failing_serializer_reports_error_exactly_once() {
    let exporter = PdfExporter::new().with_serializer(Arc::new(FailingSerializer));
    let mut sink = MemorySink::new();
    let successes = Cell::new(0);
    let errors = Cell::new(0);
    let mut stage = None;

    exporter
        .export_with_callbacks(
            demo_document(),
            &fixed_options(),
            &mut sink,
            |_| successes.set(successes.get() + 1),
            |e| {
                errors.set(errors.get() + 1);
                stage = e.stage();
            },
        )
        .await;

    assert_eq!(successes.get(), 0);
    assert_eq!(errors.get(), 1);
    assert_eq!(stage, Some(ExportState::Serializing));
    assert!(sink.artifacts().is_empty());
}

#[tokio::test]
async fn panicking_serializer_is_a_serializer_error() {
    let exporter = PdfExporter::new().with_serializer(Arc::new(PanickingSerializer));
    let mut sink = MemorySink::new();
    let err = exporter
        .export(demo_document(), &fixed_options(), &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err.root(), ExportError::Serializer(_)));
    assert!(sink.artifacts().is_empty());
}

#[tokio::test]
async fn dropping_the_export_delivers_nothing() {
    let options = ExportOptions {
        highlight_timeout_ms: 60_000,
        ..fixed_options()
    };
    let exporter = PdfExporter::new().with_highlighter(Arc::new(StalledHighlighter));
    let mut sink = MemorySink::new();
    let result = tokio::time::timeout(
        Duration::from_millis(30),
        exporter.export(demo_document(), &options, &mut sink),
    )
    .await;
    assert!(result.is_err());
    assert!(sink.artifacts().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_exports_do_not_share_state() -> TestResult {
    let exporter = PdfExporter::new();
    let mut handles = Vec::new();
    for i in 0..6 {
        let exporter = exporter.clone();
        handles.push(tokio::spawn(async move {
            let doc = Document::new(format!("d{}", i), format!("Doc {}", i), code_blocks(3));
            let mut sink = MemorySink::new();
            exporter.export(doc, &fixed_options(), &mut sink).await
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        let outcome = handle.await??;
        assert_eq!(outcome.file_name, format!("Doc {}.pdf", i));
        assert_eq!(outcome.diagnostics.code_blocks, 3);
    }
    Ok(())
}
