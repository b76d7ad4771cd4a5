use crate::fonts::StandardFont;
use crate::flow::RasterImage;
use quire_types::Color;
use std::sync::Arc;

/// A drawable item at an absolute position. Coordinates are in points from
/// the top-left corner of the page.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
}

impl PositionedElement {
    pub fn new(x: f32, y: f32, width: f32, height: f32, element: LayoutElement) -> Self {
        Self {
            x,
            y,
            width,
            height,
            element,
        }
    }

    pub fn translated(mut self, dx: f32, dy: f32) -> Self {
        self.x += dx;
        self.y += dy;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutElement {
    Text(TextElement),
    Rectangle(RectElement),
    /// Straight line from `(x, y)` to `(x + width, y + height)`.
    Line(LineElement),
    Image(ImageElement),
    Glyph(GlyphElement),
}

impl std::fmt::Display for LayoutElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutElement::Text(t) => write!(f, "Text(\"{}\")", t.content),
            LayoutElement::Rectangle(_) => write!(f, "Rectangle"),
            LayoutElement::Line(_) => write!(f, "Line"),
            LayoutElement::Image(i) => write!(f, "Image({}x{})", i.image.width_px, i.image.height_px),
            LayoutElement::Glyph(g) => write!(f, "Glyph({:?})", g.shape),
        }
    }
}

/// One line fragment of text. The box height equals the font size and the
/// baseline sits at `y + 0.8 * size`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    /// Original Unicode text.
    pub content: String,
    pub font: StandardFont,
    pub size: f32,
    pub color: Color,
    /// Extra space added to each U+0020, used for justified lines.
    pub word_spacing: f32,
    pub href: Option<String>,
}

/// Filled rectangle. Borders are drawn as thin filled rectangles too.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectElement {
    pub fill: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineElement {
    pub stroke: Stroke,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageElement {
    pub image: Arc<RasterImage>,
}

/// Small vector marks drawn inside their box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphShape {
    Checkbox { checked: bool },
    Star { filled: bool },
    Disclosure,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphElement {
    pub shape: GlyphShape,
    pub color: Color,
}
