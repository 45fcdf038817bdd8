use sqlplay_core::{Table, Value};

const MAX_CELL_WIDTH: usize = 32;

/// Render up to `limit` rows of `table` as a plain text grid, followed by a
/// row count footer.
pub fn render_grid(table: &Table, limit: usize) -> Vec<String> {
    let shown = table.row_count().min(limit);
    let header: Vec<String> = table.column_names().map(clip).collect();
    let body: Vec<Vec<String>> = table.rows()[..shown]
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|name| name.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(shown + 3);
    lines.push(format_row(&header, &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &body {
        lines.push(format_row(row, &widths));
    }
    lines.push(footer(shown, table.row_count()));
    lines
}

fn footer(shown: usize, total: usize) -> String {
    match (shown, total) {
        (_, 1) => "(1 row)".to_string(),
        (shown, total) if shown < total => format!("(showing {shown} of {total} rows)"),
        (_, total) => format!("({total} rows)"),
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn cell_text(value: &Value) -> String {
    clip(&value.to_string())
}

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}
