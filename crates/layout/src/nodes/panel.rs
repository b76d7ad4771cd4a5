use super::paragraph::{lines_or_blank, paint_line};
use super::Slice;
use crate::elements::{GlyphElement, GlyphShape, LayoutElement, PositionedElement};
use crate::flow::{Align, PanelSpec, PanelValue, Span};
use crate::fonts::StandardFont;
use crate::painting::box_painter::{paint_box, BoxStyle};

const LINE_HEIGHT: f32 = 1.4;
const ROW_GAP: f32 = 0.3;

/// Framed label/value grid. Always a single slice.
pub fn layout(spec: &PanelSpec, width: f32) -> Vec<Slice> {
    let value_x = spec.padding + spec.label_width;
    let value_width = (width - value_x - spec.padding).max(1.0);
    let line = spec.size * LINE_HEIGHT;

    let mut elements = Vec::new();
    let mut y = spec.padding;
    for (i, row) in spec.rows.iter().enumerate() {
        if i > 0 {
            y += spec.size * ROW_GAP;
        }
        let label = [Span::new(&row.label, StandardFont::HelveticaBold, spec.size, spec.label_color)];
        let label_lines = lines_or_blank(&label, (spec.label_width - 6.0).max(1.0), Align::Left, LINE_HEIGHT, spec.size);

        let mut row_elements = Vec::new();
        let mut label_y = y;
        for l in &label_lines {
            row_elements.extend(paint_line(l, &label, spec.padding, label_y));
            label_y += l.height;
        }

        let value_height = match &row.value {
            PanelValue::Text(text) => {
                let value = [Span::new(text, StandardFont::Helvetica, spec.size, spec.value_color)];
                let mut value_y = y;
                for l in lines_or_blank(&value, value_width, Align::Left, LINE_HEIGHT, spec.size) {
                    row_elements.extend(paint_line(&l, &value, value_x, value_y));
                    value_y += l.height;
                }
                value_y - y
            }
            PanelValue::Stars { filled, total } => {
                let side = spec.size;
                for i in 0..*total {
                    row_elements.push(PositionedElement::new(
                        value_x + i as f32 * side * 1.3,
                        y + (line - side) / 2.0,
                        side,
                        side,
                        LayoutElement::Glyph(GlyphElement {
                            shape: GlyphShape::Star { filled: i < *filled },
                            color: spec.star_color,
                        }),
                    ));
                }
                line
            }
        };

        elements.extend(row_elements);
        y += (label_y - y).max(value_height);
    }
    let height = y + spec.padding;

    let style = BoxStyle::filled(spec.background).with_border(spec.border, 0.75);
    let mut painted = paint_box(width, height, &style, true, true);
    painted.extend(elements);
    vec![Slice::new(height, painted)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::PanelRow;
    use quire_types::Color;

    fn spec(rows: Vec<PanelRow>) -> PanelSpec {
        PanelSpec {
            rows,
            size: 10.0,
            label_width: 110.0,
            label_color: Color::gray(90),
            value_color: Color::BLACK,
            star_color: Color::rgb(230, 160, 0),
            background: Color::rgb(248, 249, 250),
            border: Color::gray(220),
            padding: 10.0,
        }
    }

    #[test]
    fn stars_are_filled_up_to_the_level() {
        let slices = layout(
            &spec(vec![PanelRow {
                label: "Difficulty".into(),
                value: PanelValue::Stars { filled: 3, total: 5 },
            }]),
            400.0,
        );
        let stars: Vec<bool> = slices[0]
            .elements
            .iter()
            .filter_map(|e| match e.element {
                LayoutElement::Glyph(GlyphElement {
                    shape: GlyphShape::Star { filled },
                    ..
                }) => Some(filled),
                _ => None,
            })
            .collect();
        assert_eq!(stars, vec![true, true, true, false, false]);
    }

    #[test]
    fn rows_stack_inside_one_slice() {
        let rows = vec![
            PanelRow {
                label: "Author".into(),
                value: PanelValue::Text("Ada".into()),
            },
            PanelRow {
                label: "Category".into(),
                value: PanelValue::Text("Guide".into()),
            },
        ];
        let slices = layout(&spec(rows), 400.0);
        assert_eq!(slices.len(), 1);
        let ys: Vec<f32> = slices[0]
            .elements
            .iter()
            .filter_map(|e| match &e.element {
                LayoutElement::Text(t) if t.content == "Ada" || t.content == "Guide" => Some(e.y),
                _ => None,
            })
            .collect();
        assert_eq!(ys.len(), 2);
        assert!(ys[1] > ys[0]);
        assert!(slices[0].height > ys[1]);
    }
}
