//! Block renderer: canonical blocks to layout content.
//!
//! Each block becomes one [`RenderedBlock`] holding the element the layout
//! engine will place. Rendering never fails as a whole; blocks that cannot
//! be drawn as themselves degrade and are counted in [`RenderOutput`].

pub mod code;
pub mod error;
pub mod image;
pub mod list;
pub mod table;
pub mod text;

pub use error::RenderError;
pub use image::{DirectoryImageProvider, ImageProvider, MemoryImageProvider};

use crate::render::text::{align, spans_from_runs, BaseStyle};
use log::{debug, warn};
use quire_highlight::{Highlighted, Theme};
use quire_layout::{FlowContent, Marker, ParagraphSpec, RuleSpec};
use quire_model::{Block, BlockKind, TextRun};
use quire_types::{BlockId, Color};
use std::collections::HashMap;

pub const BODY_SIZE: f32 = 11.0;
pub const TEXT_COLOR: Color = Color::rgb(0x1f, 0x23, 0x28);
pub const MUTED_COLOR: Color = Color::rgb(0x6a, 0x73, 0x7d);
pub const RULE_COLOR: Color = Color::rgb(0xd0, 0xd7, 0xde);
pub const QUOTE_COLOR: Color = Color::rgb(0x57, 0x60, 0x6a);
/// Horizontal offset per nesting level.
pub const INDENT_STEP: f32 = 18.0;
const HEADING_SIZES: [f32; 6] = [24.0, 20.0, 17.0, 15.0, 13.0, 12.0];
const MIN_NESTED_WIDTH: f32 = 144.0;

pub fn heading_size(level: u8) -> f32 {
    HEADING_SIZES[(level.clamp(1, 6) - 1) as usize]
}

/// What a rendered block is, for spacing decisions downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRole {
    Paragraph,
    Heading(u8),
    ListItem,
    Quote,
    Divider,
    Code,
    Image,
    Table,
}

#[derive(Debug, Clone)]
pub struct RenderedBlock {
    pub block_id: BlockId,
    pub role: BlockRole,
    pub element: FlowContent,
    pub depth: usize,
    pub children: Vec<RenderedBlock>,
}

impl RenderedBlock {
    /// This block followed by its descendants, depth first.
    pub fn flatten(&self) -> Vec<&RenderedBlock> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    pub blocks: Vec<RenderedBlock>,
    /// Blocks drawn as a plain paragraph or dropped.
    pub degraded_blocks: usize,
    /// Images drawn as a framed placeholder.
    pub image_placeholders: usize,
}

impl RenderOutput {
    /// Every rendered block in reading order.
    pub fn flatten(&self) -> Vec<&RenderedBlock> {
        self.blocks.iter().flat_map(RenderedBlock::flatten).collect()
    }
}

pub struct BlockRenderer<'a> {
    theme: &'a Theme,
    content_width: f32,
    highlighted: &'a HashMap<BlockId, Highlighted>,
    images: Option<&'a dyn ImageProvider>,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(theme: &'a Theme, content_width: f32, highlighted: &'a HashMap<BlockId, Highlighted>) -> Self {
        Self {
            theme,
            content_width,
            highlighted,
            images: None,
        }
    }

    pub fn with_images(mut self, images: Option<&'a dyn ImageProvider>) -> Self {
        self.images = images;
        self
    }

    pub fn render(&self, blocks: &[Block]) -> RenderOutput {
        let mut output = RenderOutput::default();
        let rendered = self.render_siblings(blocks, 0, &mut output);
        output.blocks = rendered;
        output
    }

    fn render_siblings(&self, blocks: &[Block], depth: usize, output: &mut RenderOutput) -> Vec<RenderedBlock> {
        let numbers = list::sibling_numbers(blocks);
        let mut rendered = Vec::with_capacity(blocks.len());
        for (block, number) in blocks.iter().zip(numbers) {
            match self.render_block(block, depth, number, output) {
                Some((role, element)) => rendered.push(RenderedBlock {
                    block_id: block.id.clone(),
                    role,
                    element,
                    depth,
                    children: self.render_siblings(&block.children, depth + 1, output),
                }),
                // A dropped block's children take its place.
                None => rendered.extend(self.render_siblings(&block.children, depth, output)),
            }
        }
        rendered
    }

    fn width_at(&self, depth: usize) -> f32 {
        (self.content_width - depth as f32 * INDENT_STEP).max(self.content_width.min(MIN_NESTED_WIDTH))
    }

    fn render_block(
        &self,
        block: &Block,
        depth: usize,
        number: Option<usize>,
        output: &mut RenderOutput,
    ) -> Option<(BlockRole, FlowContent)> {
        let body = BaseStyle::new(BODY_SIZE, TEXT_COLOR);
        let paragraph = |base: &BaseStyle| {
            let mut spec = ParagraphSpec::new(spans_from_runs(&block.content, base));
            spec.align = align(block.alignment);
            spec
        };

        let rendered = match &block.kind {
            BlockKind::Paragraph => (BlockRole::Paragraph, FlowContent::Paragraph(paragraph(&body))),
            BlockKind::Heading { level } => {
                let mut spec = paragraph(&BaseStyle::new(heading_size(*level), TEXT_COLOR).bold());
                spec.line_height = 1.25;
                (BlockRole::Heading((*level).clamp(1, 6)), FlowContent::Paragraph(spec))
            }
            kind @ (BlockKind::BulletListItem
            | BlockKind::NumberedListItem
            | BlockKind::CheckListItem { .. }
            | BlockKind::ToggleListItem) => {
                let mut spec = paragraph(&body);
                if let Some(marker) = list::marker_for(kind, depth, number) {
                    spec.marker_width = list::marker_width(&marker, BODY_SIZE);
                    spec.marker_color = if matches!(marker, Marker::Checkbox { .. }) {
                        QUOTE_COLOR
                    } else {
                        TEXT_COLOR
                    };
                    spec.marker = Some(marker);
                }
                (BlockRole::ListItem, FlowContent::Paragraph(spec))
            }
            BlockKind::Quote => {
                let mut base = BaseStyle::new(BODY_SIZE, QUOTE_COLOR);
                base.italic = true;
                let mut spec = paragraph(&base);
                spec.border_left = Some(RULE_COLOR);
                spec.padding_x = 12.0;
                spec.padding_y = 2.0;
                (BlockRole::Quote, FlowContent::Paragraph(spec))
            }
            BlockKind::Divider => (
                BlockRole::Divider,
                FlowContent::Rule(RuleSpec {
                    color: RULE_COLOR,
                    thickness: 0.75,
                }),
            ),
            BlockKind::CodeBlock { language } => {
                let lines = self.highlighted.get(&block.id).map(|h| h.lines.as_slice());
                if lines.is_none() {
                    debug!("No highlight result for block {}; drawing plain text", block.id);
                }
                let spec = code::render_code(&block.plain_text(), language, lines, self.theme);
                (BlockRole::Code, FlowContent::Code(spec))
            }
            BlockKind::Image(props) => {
                let (spec, error) = image::render_image(props, self.images, self.width_at(depth));
                if let Some(e) = error {
                    debug!("Image block {} drawn as placeholder: {}", block.id, e);
                    output.image_placeholders += 1;
                }
                (BlockRole::Image, FlowContent::Image(spec))
            }
            BlockKind::Table(content) => match table::render_table(content, block.alignment, TEXT_COLOR, RULE_COLOR) {
                Ok(spec) => (BlockRole::Table, FlowContent::Table(spec)),
                Err(e) => return self.degrade(block, e, output),
            },
            BlockKind::Unknown { type_name } => {
                return self.degrade(block, RenderError::UnsupportedBlock(type_name.clone()), output);
            }
        };
        Some(rendered)
    }

    /// Falls back to a plain paragraph of the block's text, or drops the
    /// block when it has none.
    fn degrade(&self, block: &Block, reason: RenderError, output: &mut RenderOutput) -> Option<(BlockRole, FlowContent)> {
        output.degraded_blocks += 1;
        let text = block.extractable_text();
        if text.trim().is_empty() {
            warn!("Dropping block {}: {}", block.id, reason);
            return None;
        }
        warn!("Rendering block {} as plain text: {}", block.id, reason);
        let runs = [TextRun::plain(text)];
        let mut spec = ParagraphSpec::new(spans_from_runs(&runs, &BaseStyle::new(BODY_SIZE, TEXT_COLOR)));
        spec.align = align(block.alignment);
        Some((BlockRole::Paragraph, FlowContent::Paragraph(spec)))
    }
}
