use super::Slice;
use crate::elements::{LayoutElement, PositionedElement, Stroke, TextElement};
use crate::flow::{CodeSpan, CodeSpec};
use crate::fonts::StandardFont;
use crate::painting::box_painter::{paint_box, BoxStyle};
use quire_types::Color;

const TAB_WIDTH: usize = 4;
const BORDER_WIDTH: f32 = 0.75;

/// A wrapped visual line: segments of (text, color).
type VisualLine = Vec<(String, Color)>;

fn expand_tabs(line: &[CodeSpan]) -> VisualLine {
    let mut column = 0;
    line.iter()
        .map(|span| {
            let mut text = String::with_capacity(span.text.len());
            for c in span.text.chars() {
                if c == '\t' {
                    let pad = TAB_WIDTH - column % TAB_WIDTH;
                    text.extend(std::iter::repeat_n(' ', pad));
                    column += pad;
                } else if c != '\r' {
                    text.push(c);
                    column += 1;
                }
            }
            (text, span.color)
        })
        .collect()
}

/// Splits a source line into chunks of at most `columns` characters.
fn wrap(line: VisualLine, columns: usize) -> Vec<VisualLine> {
    let mut out = vec![Vec::new()];
    let mut used = 0;
    for (text, color) in line {
        let mut current = String::new();
        for c in text.chars() {
            if used == columns {
                if !current.is_empty() {
                    if let Some(last) = out.last_mut() {
                        last.push((std::mem::take(&mut current), color));
                    }
                }
                out.push(Vec::new());
                used = 0;
            }
            current.push(c);
            used += 1;
        }
        if !current.is_empty() {
            if let Some(last) = out.last_mut() {
                last.push((current, color));
            }
        }
    }
    out
}

/// Monospaced code, wrapped per character. Each visual line is a slice and
/// the framed background continues across page breaks.
pub fn layout(spec: &CodeSpec, width: f32) -> Vec<Slice> {
    let font = StandardFont::Courier;
    let char_width = font.char_width(' ') as f32 * spec.size / 1000.0;
    let line_height = spec.size * 1.45;
    let inner = width - 2.0 * spec.padding;
    let columns = ((inner / char_width).floor() as usize).max(1);

    let mut visual: Vec<VisualLine> = spec
        .lines
        .iter()
        .flat_map(|line| wrap(expand_tabs(line), columns))
        .collect();
    if visual.is_empty() {
        visual.push(Vec::new());
    }

    let label_size = spec.size * 0.75;
    let label_height = if spec.label.is_some() { label_size * 1.4 } else { 0.0 };
    let style = BoxStyle {
        background: Some(spec.background),
        border: Some(Stroke {
            color: spec.border,
            width: BORDER_WIDTH,
        }),
        accent: None,
    };

    let count = visual.len();
    visual
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let first = i == 0;
            let last = i + 1 == count;
            let top = if first { spec.padding + label_height } else { 0.0 };
            let bottom = if last { spec.padding } else { 0.0 };
            let height = top + line_height + bottom;

            let mut elements = paint_box(width, height, &style, first, last);
            if first && let Some((label, color)) = &spec.label {
                let label_width = font.measure(label, label_size);
                elements.push(PositionedElement::new(
                    width - spec.padding - label_width,
                    spec.padding * 0.5,
                    label_width,
                    label_size,
                    LayoutElement::Text(TextElement {
                        content: label.clone(),
                        font,
                        size: label_size,
                        color: *color,
                        word_spacing: 0.0,
                        href: None,
                    }),
                ));
            }

            let y = top + (line_height - spec.size) / 2.0;
            let mut x = spec.padding;
            for (text, color) in line {
                let w = font.measure(&text, spec.size);
                if !text.trim().is_empty() {
                    elements.push(PositionedElement::new(
                        x,
                        y,
                        w,
                        spec.size,
                        LayoutElement::Text(TextElement {
                            content: text,
                            font,
                            size: spec.size,
                            color,
                            word_spacing: 0.0,
                            href: None,
                        }),
                    ));
                }
                x += w;
            }
            Slice::new(height, elements)
        })
        .collect()
}
