use crate::encoding::{encode_win_ansi, utf16_be};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, StringFormat};
use quire_layout::{
    GlyphElement, GlyphShape, LayoutElement, LineElement, PositionedElement, RectElement, StandardFont,
    TextElement,
};
use quire_types::{Color, Rect};
use std::collections::HashMap;

/// A link area in PDF user space (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinkArea {
    pub rect: Rect,
    pub href: String,
}

#[derive(Default, Clone, PartialEq)]
struct PageRenderState {
    font: Option<StandardFont>,
    font_size: f32,
    fill_color: Option<Color>,
    word_spacing: f32,
}

/// Translates positioned elements of one page into content stream operators.
pub(crate) struct PageContext<'a> {
    page_height: f32,
    content: Content,
    state: PageRenderState,
    images: &'a HashMap<usize, String>,
    links: Vec<LinkArea>,
}

fn rgb(color: &Color) -> Vec<Object> {
    let [r, g, b] = color.to_unit_rgb();
    vec![r.into(), g.into(), b.into()]
}

impl<'a> PageContext<'a> {
    /// `images` maps a raster's address to its XObject name.
    pub fn new(page_height: f32, images: &'a HashMap<usize, String>) -> Self {
        Self {
            page_height,
            content: Content { operations: vec![] },
            state: PageRenderState::default(),
            images,
            links: Vec::new(),
        }
    }

    pub fn finish(self) -> (Content, Vec<LinkArea>) {
        (self.content, self.links)
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    pub fn draw_element(&mut self, el: &PositionedElement) {
        match &el.element {
            LayoutElement::Text(text) => self.draw_text(text, el),
            LayoutElement::Rectangle(rect) => self.draw_rect(rect, el),
            LayoutElement::Line(line) => self.draw_line(line, el),
            LayoutElement::Image(image) => {
                let key = std::sync::Arc::as_ptr(&image.image) as usize;
                match self.images.get(&key).cloned() {
                    Some(name) => self.draw_image(&name, el),
                    None => log::warn!("Image resource missing from page resources, skipping."),
                }
            }
            LayoutElement::Glyph(glyph) => self.draw_glyph(glyph, el),
        }
    }

    fn set_fill_color(&mut self, color: &Color) {
        if self.state.fill_color.as_ref() != Some(color) {
            self.op("rg", rgb(color));
            self.state.fill_color = Some(*color);
        }
    }

    fn set_stroke(&mut self, color: &Color, width: f32) {
        self.op("w", vec![width.into()]);
        self.op("RG", rgb(color));
    }

    fn draw_rect(&mut self, rect: &RectElement, el: &PositionedElement) {
        if el.width <= 0.0 || el.height <= 0.0 {
            return;
        }
        self.set_fill_color(&rect.fill);
        let y = self.page_height - (el.y + el.height);
        self.op("re", vec![el.x.into(), y.into(), el.width.into(), el.height.into()]);
        self.op("f", vec![]);
    }

    fn draw_line(&mut self, line: &LineElement, el: &PositionedElement) {
        self.set_stroke(&line.stroke.color, line.stroke.width);
        let y1 = self.page_height - el.y;
        let y2 = self.page_height - (el.y + el.height);
        self.op("m", vec![el.x.into(), y1.into()]);
        self.op("l", vec![(el.x + el.width).into(), y2.into()]);
        self.op("S", vec![]);
    }

    fn draw_text(&mut self, text: &TextElement, el: &PositionedElement) {
        if text.content.trim().is_empty() {
            return;
        }
        let actual = dictionary! {
            "ActualText" => Object::String(utf16_be(&text.content), StringFormat::Hexadecimal),
        };
        self.op("BDC", vec![Object::Name(b"Span".to_vec()), Object::Dictionary(actual)]);
        self.op("BT", vec![]);
        if self.state.font != Some(text.font) || self.state.font_size != text.size {
            self.op(
                "Tf",
                vec![Object::Name(text.font.resource_name().as_bytes().to_vec()), text.size.into()],
            );
            self.state.font = Some(text.font);
            self.state.font_size = text.size;
        }
        if self.state.word_spacing != text.word_spacing {
            self.op("Tw", vec![text.word_spacing.into()]);
            self.state.word_spacing = text.word_spacing;
        }
        self.set_fill_color(&text.color);
        let baseline = self.page_height - (el.y + text.size * 0.8);
        self.op("Td", vec![el.x.into(), baseline.into()]);
        self.op(
            "Tj",
            vec![Object::String(encode_win_ansi(&text.content), StringFormat::Literal)],
        );
        self.op("ET", vec![]);
        self.op("EMC", vec![]);

        if let Some(href) = &text.href {
            self.links.push(LinkArea {
                rect: Rect::new(el.x, self.page_height - (el.y + el.height), el.width, el.height),
                href: href.clone(),
            });
        }
    }

    fn draw_image(&mut self, name: &str, el: &PositionedElement) {
        let y = self.page_height - (el.y + el.height);
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![el.width.into(), 0.into(), 0.into(), el.height.into(), el.x.into(), y.into()],
        );
        self.op("Do", vec![Object::Name(name.as_bytes().to_vec())]);
        self.op("Q", vec![]);
        // Q restores the graphics state, including the fill color.
        self.state.fill_color = None;
    }

    fn draw_glyph(&mut self, glyph: &GlyphElement, el: &PositionedElement) {
        let x = el.x;
        let y = self.page_height - (el.y + el.height);
        let (w, h) = (el.width, el.height);
        match glyph.shape {
            GlyphShape::Checkbox { checked } => {
                if checked {
                    self.set_fill_color(&glyph.color);
                    self.op("re", vec![x.into(), y.into(), w.into(), h.into()]);
                    self.op("f", vec![]);
                    // Check mark knocked out in white.
                    self.set_stroke(&Color::WHITE, (w * 0.14).max(0.8));
                    self.op("m", vec![(x + w * 0.22).into(), (y + h * 0.52).into()]);
                    self.op("l", vec![(x + w * 0.42).into(), (y + h * 0.3).into()]);
                    self.op("l", vec![(x + w * 0.78).into(), (y + h * 0.74).into()]);
                    self.op("S", vec![]);
                } else {
                    self.set_stroke(&glyph.color, (w * 0.08).max(0.6));
                    self.op("re", vec![x.into(), y.into(), w.into(), h.into()]);
                    self.op("S", vec![]);
                }
            }
            GlyphShape::Star { filled } => {
                let (cx, cy) = (x + w / 2.0, y + h / 2.0);
                let outer = w.min(h) / 2.0;
                let inner = outer * 0.45;
                for i in 0..10 {
                    let radius = if i % 2 == 0 { outer } else { inner };
                    let angle = std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / 5.0;
                    let px = cx + radius * angle.cos();
                    let py = cy + radius * angle.sin();
                    self.op(if i == 0 { "m" } else { "l" }, vec![px.into(), py.into()]);
                }
                self.op("h", vec![]);
                if filled {
                    self.set_fill_color(&glyph.color);
                    self.op("f", vec![]);
                } else {
                    self.set_stroke(&glyph.color, 0.7);
                    self.op("S", vec![]);
                }
            }
            GlyphShape::Disclosure => {
                self.set_fill_color(&glyph.color);
                self.op("m", vec![x.into(), (y + h).into()]);
                self.op("l", vec![(x + w).into(), (y + h / 2.0).into()]);
                self.op("l", vec![x.into(), y.into()]);
                self.op("h", vec![]);
                self.op("f", vec![]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_layout::TextElement;

    fn operators(content: &Content) -> Vec<&str> {
        content.operations.iter().map(|op| op.operator.as_str()).collect()
    }

    fn text(content: &str) -> PositionedElement {
        PositionedElement::new(
            10.0,
            10.0,
            40.0,
            12.0,
            LayoutElement::Text(TextElement {
                content: content.into(),
                font: StandardFont::HelveticaBold,
                size: 12.0,
                color: Color::BLACK,
                word_spacing: 0.0,
                href: Some("https://example.com".into()),
            }),
        )
    }

    #[test]
    fn text_is_wrapped_in_actual_text_span() {
        let images = HashMap::new();
        let mut page = PageContext::new(800.0, &images);
        page.draw_element(&text("🎉 Título"));
        let (content, links) = page.finish();
        assert_eq!(
            operators(&content),
            vec!["BDC", "BT", "Tf", "rg", "Td", "Tj", "ET", "EMC"]
        );
        assert_eq!(content.operations[2].operands[0], Object::Name(b"F2".to_vec()));
        assert_eq!(links.len(), 1);
        assert!((links[0].rect.y - 778.0).abs() < 0.001);
    }

    #[test]
    fn font_and_color_are_only_set_on_change() {
        let images = HashMap::new();
        let mut page = PageContext::new(800.0, &images);
        page.draw_element(&text("a"));
        page.draw_element(&text("b"));
        let (content, _) = page.finish();
        let tf = operators(&content).iter().filter(|o| **o == "Tf").count();
        assert_eq!(tf, 1);
    }

    #[test]
    fn checkbox_fill_follows_state() {
        let images = HashMap::new();
        let glyph = |checked| {
            PositionedElement::new(
                0.0,
                0.0,
                10.0,
                10.0,
                LayoutElement::Glyph(GlyphElement {
                    shape: GlyphShape::Checkbox { checked },
                    color: Color::BLACK,
                }),
            )
        };
        let mut page = PageContext::new(100.0, &images);
        page.draw_element(&glyph(true));
        let (checked, _) = page.finish();
        assert!(operators(&checked).contains(&"f"));

        let mut page = PageContext::new(100.0, &images);
        page.draw_element(&glyph(false));
        let (unchecked, _) = page.finish();
        assert!(!operators(&unchecked).contains(&"f"));
        assert!(operators(&unchecked).contains(&"S"));
    }
}
