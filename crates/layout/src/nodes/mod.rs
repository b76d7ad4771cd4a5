//! Per-block layout. Each block lays out into a list of slices stacked top
//! to bottom; pages may only break between slices.

pub mod code;
pub mod image;
pub mod panel;
pub mod paragraph;
pub mod rule;
pub mod table;

use crate::elements::PositionedElement;
use crate::flow::FlowContent;

/// An unbreakable horizontal band of a block. Element positions are
/// relative to the slice's top-left corner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slice {
    pub height: f32,
    pub elements: Vec<PositionedElement>,
}

impl Slice {
    pub fn new(height: f32, elements: Vec<PositionedElement>) -> Self {
        Self { height, elements }
    }
}

/// Lays `content` out into a column `width` points wide.
pub fn layout_content(content: &FlowContent, width: f32) -> Vec<Slice> {
    match content {
        FlowContent::Paragraph(spec) => paragraph::layout(spec, width),
        FlowContent::Code(spec) => code::layout(spec, width),
        FlowContent::Rule(spec) => rule::layout(spec, width),
        FlowContent::Image(spec) => image::layout(spec, width),
        FlowContent::Table(spec) => table::layout(spec, width),
        FlowContent::Panel(spec) => panel::layout(spec, width),
    }
}
