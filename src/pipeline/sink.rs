//! Destinations for a finished PDF.
//!
//! Sinks only ever receive a complete artifact; nothing is written before
//! serialization succeeds.

use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;
use quire_types::DocumentId;
use regex::Regex;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

static ILLEGAL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f\x7f]"#).unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RESERVED_DEVICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(con|prn|aux|nul|com[0-9]|lpt[0-9])(\.|$)").unwrap());
const MAX_STEM_CHARS: usize = 120;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delivery task was interrupted: {0}")]
    Interrupted(String),

    /// The destination already holds the first `written` bytes.
    #[error("Wrote {written} of {total} bytes before failing; the destination holds a truncated PDF: {source}")]
    Partial {
        written: usize,
        total: usize,
        #[source]
        source: std::io::Error,
    },
}

impl DeliveryError {
    /// True when some bytes may have reached the destination.
    pub fn is_partial(&self) -> bool {
        matches!(self, DeliveryError::Partial { .. })
    }
}

/// A named, finished PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait OutputSink: Send {
    async fn deliver(&mut self, artifact: &Artifact) -> Result<(), DeliveryError>;
}

/// Keeps delivered artifacts in memory, in delivery order.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Vec<Artifact>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn last(&self) -> Option<&Artifact> {
        self.artifacts.last()
    }

    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn deliver(&mut self, artifact: &Artifact) -> Result<(), DeliveryError> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

/// Writes artifacts into a directory. Each file is written to a temporary
/// file in the same directory and renamed into place, so readers never see
/// a partial PDF.
#[derive(Debug)]
pub struct FileSink {
    directory: PathBuf,
    written: Vec<PathBuf>,
}

impl FileSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            written: Vec::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

#[async_trait]
impl OutputSink for FileSink {
    async fn deliver(&mut self, artifact: &Artifact) -> Result<(), DeliveryError> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let directory = self.directory.clone();
        let target = directory.join(&artifact.file_name);
        let bytes = artifact.bytes.clone();

        let path = tokio::task::spawn_blocking(move || -> Result<PathBuf, DeliveryError> {
            let mut temp = tempfile::NamedTempFile::new_in(&directory)?;
            temp.write_all(&bytes)?;
            temp.as_file().sync_all()?;
            temp.persist(&target).map_err(|e| DeliveryError::Io(e.error))?;
            Ok(target)
        })
        .await
        .map_err(|e| DeliveryError::Interrupted(e.to_string()))??;

        info!("Wrote {} ({} bytes)", path.display(), artifact.bytes.len());
        self.written.push(path);
        Ok(())
    }
}

/// Streams artifacts into any writer, one after another.
///
/// Not atomic: a writer cannot be rolled back, so a write that fails
/// partway leaves the bytes already written in place. That case is reported
/// as [`DeliveryError::Partial`]; a failure before the first byte is a plain
/// [`DeliveryError::Io`]. Use [`FileSink`] or [`MemorySink`] when a
/// truncated artifact must never be observable.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: Write + Send> OutputSink for WriterSink<W> {
    async fn deliver(&mut self, artifact: &Artifact) -> Result<(), DeliveryError> {
        debug!("Writing {} to stream", artifact.file_name);
        let bytes = &artifact.bytes;
        let partial = |written: usize, source: std::io::Error| DeliveryError::Partial {
            written,
            total: bytes.len(),
            source,
        };

        let mut written = 0;
        while written < bytes.len() {
            match self.writer.write(&bytes[written..]) {
                Ok(0) => return Err(partial(written, ErrorKind::WriteZero.into())),
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if written == 0 => return Err(DeliveryError::Io(e)),
                Err(e) => return Err(partial(written, e)),
            }
        }
        self.writer.flush().map_err(|e| partial(written, e))?;
        Ok(())
    }
}

/// Removes characters that are illegal in file names on common
/// filesystems, collapses whitespace and trims dots and spaces from both
/// ends.
pub fn sanitize_file_name(name: &str) -> String {
    let spaced = WHITESPACE.replace_all(name, " ");
    let stripped = ILLEGAL_CHARS.replace_all(&spaced, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let trimmed = collapsed.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let short: String = trimmed.chars().take(MAX_STEM_CHARS).collect();
    let stem = short.trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    // Windows device names cannot be used as file names, with any extension.
    if RESERVED_DEVICE.is_match(stem) {
        format!("_{}", stem)
    } else {
        stem.to_string()
    }
}

/// `<name>.pdf` from an explicit file name or the document title. Falls back
/// to `document-<id>` when nothing usable is left.
pub fn artifact_name(file_name: Option<&str>, title: &str, id: &DocumentId) -> String {
    let requested = file_name.filter(|n| !n.trim().is_empty()).unwrap_or(title);
    let requested = strip_pdf_extension(requested.trim());
    let mut stem = sanitize_file_name(requested);
    if stem.is_empty() {
        let id = sanitize_file_name(id.as_str());
        stem = format!("document-{}", if id.is_empty() { "export" } else { id.as_str() });
    }
    format!("{}.pdf", stem)
}

fn strip_pdf_extension(name: &str) -> &str {
    match name.len().checked_sub(4) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".pdf") => &name[..cut],
        _ => name,
    }
}
