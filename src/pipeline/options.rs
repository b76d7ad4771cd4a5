// src/pipeline/options.rs
use chrono::{DateTime, Utc};
use quire_highlight::ThemeKind;
use quire_types::{Margins, PageFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_HIGHLIGHT_TIMEOUT_MS: u64 = 2000;

/// Per-call export settings. Deserializes from camelCase JSON; every field
/// is optional there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Artifact name. Derived from the title when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub include_metadata: bool,
    pub include_header: bool,
    pub include_footer: bool,
    pub page_format: PageFormat,
    pub margins: Margins,
    pub theme: ThemeKind,
    pub highlight_timeout_ms: u64,
    /// Fixed generation time for header text and PDF dates. Now when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: None,
            include_metadata: true,
            include_header: true,
            include_footer: true,
            page_format: PageFormat::default(),
            margins: Margins::default(),
            theme: ThemeKind::default(),
            highlight_timeout_ms: DEFAULT_HIGHLIGHT_TIMEOUT_MS,
            generated_at: None,
        }
    }
}

impl ExportOptions {
    pub fn builder() -> ExportOptionsBuilder {
        ExportOptionsBuilder::default()
    }

    pub fn highlight_timeout(&self) -> Duration {
        Duration::from_millis(self.highlight_timeout_ms)
    }
}

/// Fluent construction of [`ExportOptions`], starting from the defaults.
#[derive(Debug, Clone, Default)]
pub struct ExportOptionsBuilder {
    options: ExportOptions,
}

impl ExportOptionsBuilder {
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.options.file_name = Some(name.into());
        self
    }

    pub fn with_metadata(mut self, include: bool) -> Self {
        self.options.include_metadata = include;
        self
    }

    pub fn with_header(mut self, include: bool) -> Self {
        self.options.include_header = include;
        self
    }

    pub fn with_footer(mut self, include: bool) -> Self {
        self.options.include_footer = include;
        self
    }

    pub fn with_page_format(mut self, format: PageFormat) -> Self {
        self.options.page_format = format;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.options.margins = margins;
        self
    }

    pub fn with_theme(mut self, theme: ThemeKind) -> Self {
        self.options.theme = theme;
        self
    }

    pub fn with_highlight_timeout(mut self, timeout: Duration) -> Self {
        self.options.highlight_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.options.generated_at = Some(at);
        self
    }

    pub fn build(self) -> ExportOptions {
        self.options
    }
}
