//! Page description engine: turns an ordered flow of blocks into pages of
//! absolutely positioned drawing elements.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Page content area of {width:.2}x{height:.2} leaves no room for content.")]
    InvalidGeometry { width: f32, height: f32 },
}

mod engine;
pub use self::engine::LayoutEngine;

pub mod algorithms;
pub mod config;
pub mod elements;
pub mod flow;
pub mod fonts;
pub mod nodes;
pub mod output;
pub mod painting;
pub mod text;

pub use self::config::LayoutConfig;
pub use self::elements::{
    GlyphElement, GlyphShape, ImageElement, LayoutElement, LineElement, PositionedElement, RectElement,
    Stroke, TextElement,
};
pub use self::flow::{
    Align, CellSpec, CodeSpan, CodeSpec, FlowBlock, FlowContent, FlowDocument, ImageSpec, Marker, PageSetup,
    PageTemplate, PanelRow, PanelSpec, PanelValue, ParagraphSpec, RasterImage, RuleSpec, Span, TableSpec,
};
pub use self::fonts::StandardFont;
pub use self::output::LaidOutDocument;
