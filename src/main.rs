use clap::Parser;
use log::{info, warn};
use quire::{DirectoryImageProvider, ExportError, ExportOptions, FileSink, PageFormat, PdfExporter, ThemeKind};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Exports a stored block document to PDF.
#[derive(Parser, Debug)]
#[command(name = "quire", version, about)]
struct Cli {
    /// Document file: editor JSON, or plain/markdown text.
    input: PathBuf,

    /// Directory the PDF is written to.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// JSON file with export options (camelCase keys). Flags override it.
    #[arg(long)]
    options: Option<PathBuf>,

    #[arg(long, value_parser = PageFormat::parse)]
    format: Option<PageFormat>,

    #[arg(long, value_parser = ThemeKind::parse)]
    theme: Option<ThemeKind>,

    #[arg(long)]
    no_header: bool,

    #[arg(long)]
    no_footer: bool,

    #[arg(long)]
    no_metadata: bool,

    #[arg(long)]
    file_name: Option<String>,

    /// Directory relative image URLs are resolved against. Defaults to the
    /// input file's directory.
    #[arg(long)]
    images: Option<PathBuf>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid options file: {0}")]
    Options(#[from] serde_json::Error),

    #[error(transparent)]
    Export(#[from] ExportError),
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

impl Cli {
    fn export_options(&self) -> Result<ExportOptions, CliError> {
        let mut options: ExportOptions = match &self.options {
            Some(path) => serde_json::from_str(&read(path)?)?,
            None => ExportOptions::default(),
        };
        if let Some(format) = self.format {
            options.page_format = format;
        }
        if let Some(theme) = self.theme {
            options.theme = theme;
        }
        if let Some(name) = &self.file_name {
            options.file_name = Some(name.clone());
        }
        options.include_header &= !self.no_header;
        options.include_footer &= !self.no_footer;
        options.include_metadata &= !self.no_metadata;
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let options = cli.export_options()?;

    let text = read(&cli.input)?;
    // Anything that is not JSON is treated as legacy text content.
    let source = serde_json::from_str::<Value>(&text).unwrap_or_else(|e| {
        warn!("{} is not JSON ({}); reading it as text", cli.input.display(), e);
        Value::String(text)
    });

    let image_root = cli
        .images
        .clone()
        .or_else(|| cli.input.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let exporter = PdfExporter::new().with_image_provider(Arc::new(DirectoryImageProvider::new(image_root)));

    let mut sink = FileSink::new(cli.output.clone());
    let outcome = exporter.export(source, &options, &mut sink).await?;
    info!(
        "Wrote {} ({} pages, {} degraded blocks, {} highlight fallbacks)",
        cli.output.join(&outcome.file_name).display(),
        outcome.page_count,
        outcome.diagnostics.degraded_blocks,
        outcome.diagnostics.highlight_fallbacks
    );
    Ok(())
}
