use crate::render::error::RenderError;
use crate::render::text::{align, spans_from_runs, BaseStyle};
use quire_layout::{CellSpec, TableSpec};
use quire_model::{MAX_TABLE_COLUMNS, TableContent, TextAlignment};
use quire_style::palette;
use quire_types::Color;

pub const CELL_SIZE: f32 = 10.0;

/// A fixed grid. Row span is always one; missing trailing cells are drawn
/// blank by the layout engine.
pub fn render_table(
    table: &TableContent,
    alignment: TextAlignment,
    text: Color,
    border: Color,
) -> Result<TableSpec, RenderError> {
    let columns = table.column_count();
    if columns == 0 || table.rows.is_empty() {
        return Err(RenderError::EmptyTable);
    }
    if columns > MAX_TABLE_COLUMNS {
        return Err(RenderError::TableTooWide {
            columns,
            max: MAX_TABLE_COLUMNS,
        });
    }
    let base = BaseStyle::new(CELL_SIZE, text);
    let rows = table
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| CellSpec {
                    spans: spans_from_runs(&cell.content, &base),
                    colspan: cell.colspan.max(1),
                    background: cell.background_color.as_deref().and_then(palette::background_color),
                    align: align(alignment),
                })
                .collect()
        })
        .collect();

    Ok(TableSpec {
        columns,
        rows,
        border,
        padding: 5.0,
        empty_size: CELL_SIZE,
    })
}
