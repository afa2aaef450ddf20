use std::borrow::Cow;
use std::fmt::Write as _;

use itertools::Itertools;

use crate::numeric::is_numeric_cell;

/// Widest cell rendered before truncation with an ellipsis.
pub const MAX_CELL_WIDTH: usize = 40;

/// Renders an aligned plain-text table. Columns whose body cells are all
/// numeric are right-aligned.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let cells = rows
        .iter()
        .map(|row| {
            (0..column_count)
                .map(|idx| clip(row.get(idx).map(String::as_str).unwrap_or("")))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut widths = headers
        .iter()
        .map(|h| char_width(h).max(1))
        .collect::<Vec<_>>();
    for row in &cells {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(char_width(cell));
        }
    }
    let right_aligned = (0..column_count)
        .map(|idx| !cells.is_empty() && cells.iter().all(|row| is_numeric_cell(&row[idx])))
        .collect::<Vec<_>>();

    let mut output = String::new();
    let header_cells = headers
        .iter()
        .map(|h| Cow::Borrowed(h.as_str()))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&header_cells, &widths, &right_aligned));
    let separator = widths
        .iter()
        .map(|w| Cow::Owned("-".repeat(*w)))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths, &right_aligned));
    for row in &cells {
        let _ = writeln!(output, "{}", format_row(row, &widths, &right_aligned));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[Cow<'_, str>], widths: &[usize], right_aligned: &[bool]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .zip(right_aligned)
        .map(|((value, width), right)| {
            let width = *width;
            if *right {
                format!("{value:>width$}")
            } else {
                format!("{value:<width$}")
            }
        })
        .join("  ");
    line.trim_end().to_string()
}

fn char_width(value: &str) -> usize {
    value.chars().count()
}

// Newlines and tabs would break the grid; long values are cut.
fn clip(value: &str) -> Cow<'_, str> {
    let needs_flatten = value.contains(['\n', '\r', '\t']);
    let too_wide = char_width(value) > MAX_CELL_WIDTH;
    if !needs_flatten && !too_wide {
        return Cow::Borrowed(value);
    }
    let mut flattened = value
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch })
        .collect::<String>();
    if too_wide {
        flattened = flattened.chars().take(MAX_CELL_WIDTH - 1).collect();
        flattened.push('…');
    }
    Cow::Owned(flattened)
}
