//! Document assembler: rendered blocks plus page furniture in reading order.
//!
//! The assembler only supplies content and spacing hints. Where pages break
//! is decided by the layout engine.

use crate::pipeline::options::ExportOptions;
use crate::render::{
    BlockRole, RenderOutput, RenderedBlock, INDENT_STEP, MUTED_COLOR, RULE_COLOR, TEXT_COLOR,
};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use quire_layout::{
    FlowBlock, FlowContent, FlowDocument, PageSetup, PageTemplate, PanelRow, PanelSpec, PanelValue,
    ParagraphSpec, RuleSpec, Span, StandardFont,
};
use quire_model::{Document, DocumentMetadata};
use quire_types::Color;

const TITLE_SIZE: f32 = 22.0;
const PANEL_SIZE: f32 = 9.5;
const TEMPLATE_SIZE: f32 = 8.5;
const STAR_COLOR: Color = Color::rgb(0xe3, 0xa0, 0x08);
const PANEL_BACKGROUND: Color = Color::rgb(0xf6, 0xf8, 0xfa);
pub const DIFFICULTY_SCALE: u8 = 5;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Space before and after a block of the given role.
fn spacing(role: BlockRole) -> (f32, f32) {
    match role {
        BlockRole::Paragraph => (0.0, 6.0),
        BlockRole::Heading(level) => ([18.0, 16.0, 14.0, 12.0, 10.0, 10.0][(level.clamp(1, 6) - 1) as usize], 6.0),
        BlockRole::ListItem => (0.0, 3.0),
        BlockRole::Quote => (4.0, 8.0),
        BlockRole::Divider => (10.0, 10.0),
        BlockRole::Code => (4.0, 10.0),
        BlockRole::Image | BlockRole::Table => (6.0, 10.0),
    }
}

fn flow_block(block: &RenderedBlock) -> FlowBlock {
    let (before, after) = spacing(block.role);
    let flow = FlowBlock::new(block.element.clone())
        .with_spacing(before, after)
        .with_indent(block.depth as f32 * INDENT_STEP);
    match block.role {
        BlockRole::Heading(_) => flow.keep_with_next(),
        _ => flow,
    }
}

fn title_banner(title: &str) -> Vec<FlowBlock> {
    let mut spec = ParagraphSpec::new(vec![Span::new(title, StandardFont::HelveticaBold, TITLE_SIZE, TEXT_COLOR)]);
    spec.line_height = 1.2;
    vec![
        FlowBlock::new(FlowContent::Paragraph(spec)).with_spacing(0.0, 6.0).keep_with_next(),
        FlowBlock::new(FlowContent::Rule(RuleSpec {
            color: TEXT_COLOR,
            thickness: 1.5,
        }))
        .with_spacing(0.0, 14.0)
        .keep_with_next(),
    ]
}

/// Label/value rows for the metadata panel, in display order. Empty fields
/// are left out.
pub fn metadata_rows(metadata: &DocumentMetadata) -> Vec<PanelRow> {
    let text = |label: &str, value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| PanelRow {
            label: label.to_string(),
            value: PanelValue::Text(value.to_string()),
        })
    };

    [
        metadata.category.as_deref().and_then(|c| text("Category", c)),
        metadata.difficulty_level.map(|level| PanelRow {
            label: "Difficulty".to_string(),
            value: PanelValue::Stars {
                filled: level.min(DIFFICULTY_SCALE),
                total: DIFFICULTY_SCALE,
            },
        }),
        metadata
            .created_at
            .and_then(|at| text("Created", &at.format(DATE_FORMAT).to_string())),
        metadata.estimated_time.as_deref().and_then(|t| text("Estimated time", t)),
        metadata.author.as_deref().and_then(|a| text("Author", a)),
        text("Tags", &metadata.tags.iter().join(", ")),
        metadata.case_reference.as_deref().and_then(|c| text("Case", c)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn metadata_panel(metadata: &DocumentMetadata) -> Option<FlowBlock> {
    let rows = metadata_rows(metadata);
    if rows.is_empty() {
        return None;
    }
    Some(
        FlowBlock::new(FlowContent::Panel(PanelSpec {
            rows,
            size: PANEL_SIZE,
            label_width: 90.0,
            label_color: MUTED_COLOR,
            value_color: TEXT_COLOR,
            star_color: STAR_COLOR,
            background: PANEL_BACKGROUND,
            border: RULE_COLOR,
            padding: 10.0,
        }))
        .with_spacing(0.0, 16.0),
    )
}

fn template(left: String, center: String, right: String) -> PageTemplate {
    PageTemplate {
        left,
        center,
        right,
        size: TEMPLATE_SIZE,
        color: MUTED_COLOR,
        rule: Some(RULE_COLOR),
    }
}

/// Builds the flow for one export. `generated_at` feeds the header date.
pub fn assemble(
    document: &Document,
    rendered: &RenderOutput,
    options: &ExportOptions,
    generated_at: DateTime<Utc>,
) -> FlowDocument {
    let mut blocks = Vec::with_capacity(rendered.blocks.len() + 3);

    let title = document.title.trim();
    if !title.is_empty() {
        blocks.extend(title_banner(title));
    }
    if options.include_metadata
        && let Some(panel) = document.metadata.as_ref().and_then(metadata_panel)
    {
        blocks.push(panel);
    }
    blocks.extend(rendered.flatten().into_iter().map(flow_block));

    FlowDocument {
        page: PageSetup::new(options.page_format, options.margins),
        header: options.include_header.then(|| {
            template(
                title.to_string(),
                String::new(),
                generated_at.format(DATE_FORMAT).to_string(),
            )
        }),
        footer: options
            .include_footer
            .then(|| template(String::new(), "Page {page} of {pages}".to_string(), String::new())),
        blocks,
    }
}
