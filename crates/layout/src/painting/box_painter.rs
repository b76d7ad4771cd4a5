use crate::elements::{LayoutElement, PositionedElement, RectElement, Stroke};
use quire_types::Color;

/// Fill and borders of a box that may be split across pages.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxStyle {
    pub background: Option<Color>,
    /// Drawn on all four sides.
    pub border: Option<Stroke>,
    /// Accent bar on the left edge, drawn over `border`.
    pub accent: Option<Stroke>,
}

impl BoxStyle {
    pub fn filled(color: Color) -> Self {
        Self {
            background: Some(color),
            ..Self::default()
        }
    }

    pub fn with_border(mut self, color: Color, width: f32) -> Self {
        self.border = Some(Stroke { color, width });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.border.is_none() && self.accent.is_none()
    }
}

fn rect(x: f32, y: f32, width: f32, height: f32, fill: Color) -> PositionedElement {
    PositionedElement::new(x, y, width, height, LayoutElement::Rectangle(RectElement { fill }))
}

/// Generates background and border elements for one piece of a box, with
/// its top-left corner at the origin.
///
/// `draw_top` and `draw_bottom` are false for the edges where the box
/// continues on another page, so a split box reads as open at the break.
pub fn paint_box(
    width: f32,
    height: f32,
    style: &BoxStyle,
    draw_top: bool,
    draw_bottom: bool,
) -> Vec<PositionedElement> {
    let mut elements = Vec::new();
    if width <= 0.0 || height <= 0.0 {
        return elements;
    }

    if let Some(background) = style.background {
        elements.push(rect(0.0, 0.0, width, height, background));
    }

    if let Some(border) = style.border.filter(|b| b.width > 0.0) {
        let w = border.width;
        if draw_top {
            elements.push(rect(0.0, 0.0, width, w, border.color));
        }
        if draw_bottom {
            elements.push(rect(0.0, height - w, width, w, border.color));
        }
        elements.push(rect(0.0, 0.0, w, height, border.color));
        elements.push(rect(width - w, 0.0, w, height, border.color));
    }

    if let Some(accent) = style.accent.filter(|a| a.width > 0.0) {
        elements.push(rect(0.0, 0.0, accent.width, height, accent.color));
    }

    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_edges_skip_horizontal_borders() {
        let style = BoxStyle::filled(Color::WHITE).with_border(Color::BLACK, 1.0);
        let closed = paint_box(100.0, 20.0, &style, true, true);
        let open = paint_box(100.0, 20.0, &style, false, false);
        assert_eq!(closed.len(), 5);
        assert_eq!(open.len(), 3);
    }

    #[test]
    fn empty_box_paints_nothing() {
        assert!(paint_box(100.0, 0.0, &BoxStyle::filled(Color::WHITE), true, true).is_empty());
        assert!(paint_box(100.0, 10.0, &BoxStyle::default(), true, true).is_empty());
    }
}
