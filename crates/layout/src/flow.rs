//! Input to the layout engine: an ordered flow of blocks plus page setup.
//!
//! Nothing here knows about pages. Blocks only carry size hints; the engine
//! decides where pages break.

use crate::fonts::StandardFont;
use quire_types::{Color, Margins, PageFormat};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FlowDocument {
    pub page: PageSetup,
    pub header: Option<PageTemplate>,
    pub footer: Option<PageTemplate>,
    pub blocks: Vec<FlowBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageSetup {
    pub fn new(format: PageFormat, margins: Margins) -> Self {
        let (width, height) = format.dimensions_pt();
        Self {
            width,
            height,
            margins,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margins.horizontal()
    }

    pub fn content_height(&self) -> f32 {
        self.height - self.margins.vertical()
    }
}

/// Text repeated on every page in the top or bottom margin. `{page}` and
/// `{pages}` are replaced once the page count is known.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTemplate {
    pub left: String,
    pub center: String,
    pub right: String,
    pub size: f32,
    pub color: Color,
    /// Separator drawn between the template and the body.
    pub rule: Option<Color>,
}

impl PageTemplate {
    pub fn render(text: &str, page: usize, pages: usize) -> String {
        text.replace("{page}", &page.to_string())
            .replace("{pages}", &pages.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct FlowBlock {
    pub content: FlowContent,
    pub indent: f32,
    pub space_before: f32,
    pub space_after: f32,
    /// Move to the next page together with the following block.
    pub keep_with_next: bool,
}

impl FlowBlock {
    pub fn new(content: FlowContent) -> Self {
        Self {
            content,
            indent: 0.0,
            space_before: 0.0,
            space_after: 0.0,
            keep_with_next: false,
        }
    }

    pub fn with_spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    pub fn with_indent(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn keep_with_next(mut self) -> Self {
        self.keep_with_next = true;
        self
    }
}

#[derive(Debug, Clone)]
pub enum FlowContent {
    Paragraph(ParagraphSpec),
    Code(CodeSpec),
    Rule(RuleSpec),
    Image(ImageSpec),
    Table(TableSpec),
    Panel(PanelSpec),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// A run of text drawn with one font, size and color.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub font: StandardFont,
    pub size: f32,
    pub color: Color,
    pub background: Option<Color>,
    pub underline: bool,
    pub line_through: bool,
    pub href: Option<String>,
}

impl Span {
    pub fn new(text: impl Into<String>, font: StandardFont, size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            font,
            size,
            color,
            background: None,
            underline: false,
            line_through: false,
            href: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// Bullet character or list number, drawn in the paragraph's first span style.
    Text(String),
    Checkbox { checked: bool },
    Disclosure,
}

#[derive(Debug, Clone)]
pub struct ParagraphSpec {
    pub spans: Vec<Span>,
    pub align: Align,
    /// Multiple of the largest span size.
    pub line_height: f32,
    pub marker: Option<Marker>,
    pub marker_width: f32,
    pub marker_color: Color,
    pub border_left: Option<Color>,
    pub background: Option<Color>,
    pub padding_x: f32,
    pub padding_y: f32,
}

impl ParagraphSpec {
    pub fn new(spans: Vec<Span>) -> Self {
        Self {
            spans,
            align: Align::Left,
            line_height: 1.4,
            marker: None,
            marker_width: 0.0,
            marker_color: Color::BLACK,
            border_left: None,
            background: None,
            padding_x: 0.0,
            padding_y: 0.0,
        }
    }

    pub fn max_size(&self) -> f32 {
        self.spans.iter().map(|s| s.size).fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeSpan {
    pub text: String,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct CodeSpec {
    pub lines: Vec<Vec<CodeSpan>>,
    pub size: f32,
    pub background: Color,
    pub border: Color,
    pub padding: f32,
    /// Language name drawn in the top right corner.
    pub label: Option<(String, Color)>,
}

#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub color: Color,
    pub thickness: f32,
}

/// Decoded RGB8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width_px: u32,
    pub height_px: u32,
    pub rgb: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImageSpec {
    pub width: f32,
    pub height: f32,
    /// `None` draws a framed placeholder carrying `alt`.
    pub raster: Option<Arc<RasterImage>>,
    pub alt: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CellSpec {
    pub spans: Vec<Span>,
    pub colspan: usize,
    pub background: Option<Color>,
    pub align: Align,
}

#[derive(Debug, Clone)]
pub struct TableSpec {
    pub columns: usize,
    pub rows: Vec<Vec<CellSpec>>,
    pub border: Color,
    pub padding: f32,
    /// Line height of blank cells.
    pub empty_size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelValue {
    Text(String),
    Stars { filled: u8, total: u8 },
}

#[derive(Debug, Clone)]
pub struct PanelRow {
    pub label: String,
    pub value: PanelValue,
}

#[derive(Debug, Clone)]
pub struct PanelSpec {
    pub rows: Vec<PanelRow>,
    pub size: f32,
    pub label_width: f32,
    pub label_color: Color,
    pub value_color: Color,
    pub star_color: Color,
    pub background: Color,
    pub border: Color,
    pub padding: f32,
}
