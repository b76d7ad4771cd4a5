use super::Slice;
use crate::elements::{
    GlyphElement, GlyphShape, LayoutElement, LineElement, PositionedElement, RectElement, Stroke,
    TextElement,
};
use crate::flow::{Marker, ParagraphSpec, Span};
use crate::fonts::StandardFont;
use crate::painting::box_painter::{paint_box, BoxStyle};
use crate::text::{break_lines, LineLayout};

const DEFAULT_SIZE: f32 = 11.0;
const ACCENT_WIDTH: f32 = 3.0;

/// Emits text, highlight and decoration elements for one line whose box
/// starts at `(x, y)`.
pub fn paint_line(line: &LineLayout, spans: &[Span], x: f32, y: f32) -> Vec<PositionedElement> {
    let mut elements = Vec::new();
    let baseline = y + line.baseline();
    for fragment in &line.fragments {
        let span = &spans[fragment.span];
        let fx = x + fragment.x;
        let top = baseline - span.size * 0.8;

        if let Some(background) = span.background {
            elements.push(PositionedElement::new(
                fx,
                top - span.size * 0.15,
                fragment.width,
                span.size * 1.3,
                LayoutElement::Rectangle(RectElement { fill: background }),
            ));
        }

        elements.push(PositionedElement::new(
            fx,
            top,
            fragment.width,
            span.size,
            LayoutElement::Text(TextElement {
                content: fragment.text.clone(),
                font: span.font,
                size: span.size,
                color: span.color,
                word_spacing: line.word_spacing,
                href: span.href.clone(),
            }),
        ));

        let stroke = Stroke {
            color: span.color,
            width: (span.size * 0.05).max(0.5),
        };
        let mut decorate = |offset: f32| {
            elements.push(PositionedElement::new(
                fx,
                baseline + offset,
                fragment.width,
                0.0,
                LayoutElement::Line(LineElement { stroke }),
            ));
        };
        if span.underline {
            decorate(span.size * 0.12);
        }
        if span.line_through {
            decorate(-span.size * 0.28);
        }
    }
    elements
}

/// Lines of `spans`, or a single empty line when there is no text so the
/// block still takes up one line of space.
pub fn lines_or_blank(
    spans: &[Span],
    width: f32,
    align: crate::flow::Align,
    line_height: f32,
    fallback_size: f32,
) -> Vec<LineLayout> {
    let lines = break_lines(spans, width, align, line_height, fallback_size);
    if !lines.is_empty() {
        return lines;
    }
    vec![LineLayout {
        fragments: Vec::new(),
        width: 0.0,
        height: fallback_size * line_height,
        size: fallback_size,
        word_spacing: 0.0,
    }]
}

fn paint_marker(spec: &ParagraphSpec, marker: &Marker, line: &LineLayout, x: f32, y: f32) -> PositionedElement {
    let size = spec.spans.first().map_or(line.size, |s| s.size);
    match marker {
        Marker::Text(text) => {
            let font = StandardFont::Helvetica;
            let width = font.measure(text, size);
            PositionedElement::new(
                x,
                y + line.baseline() - size * 0.8,
                width,
                size,
                LayoutElement::Text(TextElement {
                    content: text.clone(),
                    font,
                    size,
                    color: spec.marker_color,
                    word_spacing: 0.0,
                    href: None,
                }),
            )
        }
        Marker::Checkbox { checked } => {
            let side = size * 0.85;
            PositionedElement::new(
                x,
                y + (line.height - side) / 2.0,
                side,
                side,
                LayoutElement::Glyph(GlyphElement {
                    shape: GlyphShape::Checkbox { checked: *checked },
                    color: spec.marker_color,
                }),
            )
        }
        Marker::Disclosure => {
            let side = size * 0.6;
            PositionedElement::new(
                x + size * 0.1,
                y + (line.height - side) / 2.0,
                side,
                side,
                LayoutElement::Glyph(GlyphElement {
                    shape: GlyphShape::Disclosure,
                    color: spec.marker_color,
                }),
            )
        }
    }
}

/// One slice per line, so long paragraphs may split across pages. The
/// background and accent bar are painted per slice and join up visually.
pub fn layout(spec: &ParagraphSpec, width: f32) -> Vec<Slice> {
    let fallback = match spec.max_size() {
        s if s > 0.0 => s,
        _ => DEFAULT_SIZE,
    };
    let text_x = spec.padding_x + spec.marker_width;
    let text_width = (width - text_x - spec.padding_x).max(1.0);
    let lines = lines_or_blank(&spec.spans, text_width, spec.align, spec.line_height, fallback);

    let style = BoxStyle {
        background: spec.background,
        border: None,
        accent: spec.border_left.map(|color| Stroke {
            color,
            width: ACCENT_WIDTH,
        }),
    };

    let count = lines.len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let first = i == 0;
            let last = i + 1 == count;
            let top = if first { spec.padding_y } else { 0.0 };
            let bottom = if last { spec.padding_y } else { 0.0 };
            let height = top + line.height + bottom;

            let mut elements = if style.is_empty() {
                Vec::new()
            } else {
                paint_box(width, height, &style, first, last)
            };
            if first && let Some(marker) = &spec.marker {
                elements.push(paint_marker(spec, marker, line, spec.padding_x, top));
            }
            elements.extend(paint_line(line, &spec.spans, text_x, top));
            Slice::new(height, elements)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Align;
    use quire_types::Color;

    fn spec(text: &str) -> ParagraphSpec {
        ParagraphSpec::new(vec![Span::new(text, StandardFont::Helvetica, 10.0, Color::BLACK)])
    }

    fn texts(slices: &[Slice]) -> Vec<String> {
        slices
            .iter()
            .flat_map(|s| &s.elements)
            .filter_map(|e| match &e.element {
                LayoutElement::Text(t) => Some(t.content.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn each_line_is_its_own_slice() {
        let slices = layout(&spec("lorem ipsum dolor sit amet consectetur"), 60.0);
        assert!(slices.len() > 1);
        assert!(slices.iter().all(|s| (s.height - 14.0).abs() < 0.001));
    }

    #[test]
    fn empty_paragraph_keeps_one_line() {
        let slices = layout(&spec(""), 200.0);
        assert_eq!(slices.len(), 1);
        assert!(slices[0].height > 0.0);
        assert!(texts(&slices).is_empty());
    }

    #[test]
    fn marker_is_drawn_before_text_on_first_line_only() {
        let mut s = spec("one two three four five six seven");
        s.marker = Some(Marker::Text("\u{2022}".into()));
        s.marker_width = 14.0;
        let slices = layout(&s, 80.0);
        let first = texts(&slices[..1]);
        assert_eq!(first[0], "\u{2022}");
        assert!(!texts(&slices[1..]).contains(&"\u{2022}".to_string()));
        let text_x = slices[0].elements.iter().filter_map(|e| match &e.element {
            LayoutElement::Text(t) if t.content != "\u{2022}" => Some(e.x),
            _ => None,
        });
        assert!(text_x.into_iter().all(|x| x >= 14.0));
    }

    #[test]
    fn decorations_follow_span_flags() {
        let mut s = spec("link");
        s.spans[0].underline = true;
        s.spans[0].line_through = true;
        s.spans[0].href = Some("https://example.com".into());
        let slices = layout(&s, 200.0);
        let lines = slices[0]
            .elements
            .iter()
            .filter(|e| matches!(e.element, LayoutElement::Line(_)))
            .count();
        assert_eq!(lines, 2);
        let href = slices[0].elements.iter().find_map(|e| match &e.element {
            LayoutElement::Text(t) => t.href.clone(),
            _ => None,
        });
        assert_eq!(href.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn padded_background_adds_to_first_and_last_slice() {
        let mut s = spec("quoted words that wrap over lines");
        s.align = Align::Left;
        s.background = Some(Color::rgb(240, 240, 240));
        s.border_left = Some(Color::rgb(200, 200, 200));
        s.padding_x = 8.0;
        s.padding_y = 4.0;
        let slices = layout(&s, 80.0);
        assert!(slices.len() > 2);
        assert!((slices[0].height - 18.0).abs() < 0.001);
        assert!((slices[1].height - 14.0).abs() < 0.001);
        assert!((slices.last().unwrap().height - 18.0).abs() < 0.001);
        assert!(matches!(slices[1].elements[0].element, LayoutElement::Rectangle(_)));
    }
}
