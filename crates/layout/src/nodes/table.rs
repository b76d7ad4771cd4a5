use super::paragraph::{lines_or_blank, paint_line};
use super::Slice;
use crate::elements::Stroke;
use crate::flow::TableSpec;
use crate::painting::box_painter::{paint_box, BoxStyle};

const BORDER_WIDTH: f32 = 0.5;
const LINE_HEIGHT: f32 = 1.3;

/// Number of grid columns: the declared count, widened to fit the widest row.
pub fn column_count(spec: &TableSpec) -> usize {
    let widest = spec
        .rows
        .iter()
        .map(|row| row.iter().map(|c| c.colspan.max(1)).fold(0, usize::saturating_add))
        .max()
        .unwrap_or(0);
    spec.columns.max(widest).max(1)
}

/// Equal-width grid. Each row is one slice; rows never split.
pub fn layout(spec: &TableSpec, width: f32) -> Vec<Slice> {
    let columns = column_count(spec);
    let column_width = width / columns as f32;
    let inner = |span: usize| (span as f32 * column_width - 2.0 * spec.padding).max(1.0);
    let border = Some(Stroke {
        color: spec.border,
        width: BORDER_WIDTH,
    });

    spec.rows
        .iter()
        .map(|row| {
            let mut cells = Vec::new();
            let mut column = 0;
            for cell in row {
                if column >= columns {
                    break;
                }
                let span = cell.colspan.clamp(1, columns - column);
                let lines = lines_or_blank(&cell.spans, inner(span), cell.align, LINE_HEIGHT, spec.empty_size);
                cells.push((column, span, cell, lines));
                column += span;
            }

            let content_height = cells
                .iter()
                .map(|(_, _, _, lines)| lines.iter().map(|l| l.height).sum::<f32>())
                .fold(spec.empty_size * LINE_HEIGHT, f32::max);
            let height = content_height + 2.0 * spec.padding;

            let mut elements = Vec::new();
            for (start, span, cell, lines) in &cells {
                let x = *start as f32 * column_width;
                let style = BoxStyle {
                    background: cell.background,
                    border,
                    accent: None,
                };
                elements.extend(
                    paint_box(*span as f32 * column_width, height, &style, true, true)
                        .into_iter()
                        .map(|e| e.translated(x, 0.0)),
                );
                let mut y = spec.padding;
                for line in lines {
                    elements.extend(paint_line(line, &cell.spans, x + spec.padding, y));
                    y += line.height;
                }
            }

            // Rows shorter than the grid are padded with blank cells.
            let blank = BoxStyle {
                background: None,
                border,
                accent: None,
            };
            for start in column..columns {
                elements.extend(
                    paint_box(column_width, height, &blank, true, true)
                        .into_iter()
                        .map(|e| e.translated(start as f32 * column_width, 0.0)),
                );
            }

            Slice::new(height, elements)
        })
        .collect()
}
