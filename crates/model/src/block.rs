//! The canonical block tree consumed by the renderer.

use quire_types::BlockId;
use serde::{Deserialize, Serialize};

/// One semantic node of a document's content tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub alignment: TextAlignment,
    /// Inline content in reading order.
    pub content: Vec<TextRun>,
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            alignment: TextAlignment::default(),
            content: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn paragraph(id: impl Into<BlockId>, content: Vec<TextRun>) -> Self {
        Self::new(id, BlockKind::Paragraph).with_content(content)
    }

    pub fn heading(id: impl Into<BlockId>, level: u8, text: impl Into<String>) -> Self {
        Self::new(id, BlockKind::Heading { level }).with_content(vec![TextRun::plain(text)])
    }

    pub fn code(id: impl Into<BlockId>, language: impl Into<String>, code: impl Into<String>) -> Self {
        Self::new(
            id,
            BlockKind::CodeBlock {
                language: language.into(),
            },
        )
        .with_content(vec![TextRun::plain(code)])
    }

    pub fn check_item(id: impl Into<BlockId>, text: impl Into<String>, checked: bool) -> Self {
        Self::new(id, BlockKind::CheckListItem { checked }).with_content(vec![TextRun::plain(text)])
    }

    pub fn with_content(mut self, content: Vec<TextRun>) -> Self {
        self.content = content;
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Concatenation of all inline runs, in reading order.
    pub fn plain_text(&self) -> String {
        self.content.iter().map(|r| r.text.as_str()).collect()
    }

    /// Text reachable from this block: its own runs, table cells, image alt
    /// text. Used when a block has to degrade to a plain paragraph.
    pub fn extractable_text(&self) -> String {
        let own = self.plain_text();
        if !own.trim().is_empty() {
            return own;
        }
        match &self.kind {
            BlockKind::Table(table) => table
                .rows
                .iter()
                .map(|row| {
                    row.cells
                        .iter()
                        .map(TableCell::plain_text)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join("\n"),
            BlockKind::Image(image) => image.alt.clone(),
            _ => own,
        }
    }

    pub fn type_tag(&self) -> &str {
        self.kind.type_tag()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Paragraph,
    Heading { level: u8 },
    BulletListItem,
    NumberedListItem,
    CheckListItem { checked: bool },
    ToggleListItem,
    Quote,
    Divider,
    CodeBlock { language: String },
    Image(ImageProps),
    Table(TableContent),
    /// A block type this model does not know. Its runs hold whatever text
    /// could be extracted from the stored block.
    Unknown { type_name: String },
}

impl BlockKind {
    /// The editor's type tag for this variant.
    pub fn type_tag(&self) -> &str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading { .. } => "heading",
            BlockKind::BulletListItem => "bulletListItem",
            BlockKind::NumberedListItem => "numberedListItem",
            BlockKind::CheckListItem { .. } => "checkListItem",
            BlockKind::ToggleListItem => "toggleListItem",
            BlockKind::Quote => "quote",
            BlockKind::Divider => "divider",
            BlockKind::CodeBlock { .. } => "codeBlock",
            BlockKind::Image(_) => "image",
            BlockKind::Table(_) => "table",
            BlockKind::Unknown { type_name } => type_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageProps {
    pub url: String,
    pub alt: String,
    pub caption: String,
    /// Intrinsic width in pixels; only ever `Some` when positive.
    pub width: Option<f32>,
    /// Intrinsic height in pixels; only ever `Some` when positive.
    pub height: Option<f32>,
}

/// Widest grid a table may declare or span. Wider tables are drawn as text.
pub const MAX_TABLE_COLUMNS: usize = 64;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableContent {
    /// Declared column count. The grid is at least this wide.
    pub columns: Option<usize>,
    pub rows: Vec<TableRow>,
}

impl TableContent {
    /// Width of the rendered grid: the declared column count or the widest
    /// row, whichever is larger.
    pub fn column_count(&self) -> usize {
        let widest = self
            .rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.colspan.max(1)).fold(0, usize::saturating_add))
            .max()
            .unwrap_or(0);
        self.columns.unwrap_or(0).max(widest)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub content: Vec<TextRun>,
    pub colspan: usize,
    pub background_color: Option<String>,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            colspan: 1,
            background_color: None,
        }
    }
}

impl TableCell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextRun::plain(text)],
            ..Self::default()
        }
    }

    pub fn plain_text(&self) -> String {
        self.content.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A contiguous text span sharing one style set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    pub text: String,
    pub styles: TextStyles,
    pub link: Option<String>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn styled(text: impl Into<String>, styles: TextStyles) -> Self {
        Self {
            text: text.into(),
            styles,
            link: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(
            text,
            TextStyles {
                bold: true,
                ..TextStyles::default()
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyles {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    #[serde(alias = "strike")]
    pub strikethrough: bool,
    pub code: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl TextStyles {
    pub fn is_plain(&self) -> bool {
        *self == TextStyles::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlignment {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "start" => Some(TextAlignment::Left),
            "center" | "centre" => Some(TextAlignment::Center),
            "right" | "end" => Some(TextAlignment::Right),
            "justify" => Some(TextAlignment::Justify),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlignment::Left => "left",
            TextAlignment::Center => "center",
            TextAlignment::Right => "right",
            TextAlignment::Justify => "justify",
        }
    }
}
