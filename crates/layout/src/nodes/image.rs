use super::paragraph::paint_line;
use super::Slice;
use crate::elements::{ImageElement, LayoutElement, PositionedElement};
use crate::flow::{Align, ImageSpec, Span};
use crate::fonts::StandardFont;
use crate::painting::box_painter::{paint_box, BoxStyle};
use crate::text::break_lines;
use quire_types::Color;

const PLACEHOLDER_FILL: Color = Color::rgb(245, 245, 245);
const PLACEHOLDER_BORDER: Color = Color::rgb(200, 200, 200);
const MUTED: Color = Color::rgb(110, 110, 110);
const CAPTION_SIZE: f32 = 9.0;
const CAPTION_GAP: f32 = 4.0;
const UNAVAILABLE: &str = "Image unavailable";

fn muted_span(text: &str) -> Span {
    Span::new(text, StandardFont::HelveticaOblique, CAPTION_SIZE, MUTED)
}

/// Image centered in the column with its caption below. The image and its
/// caption always stay together on one page.
pub fn layout(spec: &ImageSpec, width: f32) -> Vec<Slice> {
    let (w, h) = if spec.width > width && spec.width > 0.0 {
        (width, spec.height * width / spec.width)
    } else {
        (spec.width, spec.height)
    };
    let x = ((width - w) / 2.0).max(0.0);
    let mut elements = Vec::new();

    match &spec.raster {
        Some(raster) => elements.push(PositionedElement::new(
            x,
            0.0,
            w,
            h,
            LayoutElement::Image(ImageElement {
                image: raster.clone(),
            }),
        )),
        None => {
            let style = BoxStyle::filled(PLACEHOLDER_FILL).with_border(PLACEHOLDER_BORDER, 0.75);
            elements.extend(
                paint_box(w, h, &style, true, true)
                    .into_iter()
                    .map(|e| e.translated(x, 0.0)),
            );
            let label = if spec.alt.trim().is_empty() {
                UNAVAILABLE
            } else {
                spec.alt.as_str()
            };
            let spans = [muted_span(label)];
            let lines = break_lines(&spans, (w - 16.0).max(1.0), Align::Center, 1.3, CAPTION_SIZE);
            let total: f32 = lines.iter().map(|l| l.height).sum();
            let mut y = ((h - total) / 2.0).max(0.0);
            for line in &lines {
                if y + line.height > h {
                    break;
                }
                elements.extend(paint_line(line, &spans, x + 8.0, y));
                y += line.height;
            }
        }
    }

    let mut height = h;
    if let Some(caption) = spec.caption.as_deref().filter(|c| !c.trim().is_empty()) {
        let spans = [muted_span(caption)];
        height += CAPTION_GAP;
        for line in break_lines(&spans, width, Align::Center, 1.3, CAPTION_SIZE) {
            elements.extend(paint_line(&line, &spans, 0.0, height));
            height += line.height;
        }
    }

    vec![Slice::new(height, elements)]
}
