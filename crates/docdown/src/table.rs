//! Table layout
//!
//! Cells arrive already rendered; this module only measures, pads and
//! joins them.

use docdown_core::Alignment;

/// Lay out a pipe table with every column padded to its widest cell.
///
/// Short rows are padded with empty cells; the column count is the widest
/// of the header and all rows.
pub(crate) fn format_table(
    header: &[String],
    aligns: &[Option<Alignment>],
    rows: &[Vec<String>],
    min_width: usize,
) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    // Separators need room for an alignment colon on each side
    let min_width = min_width.max(3);
    let mut widths = vec![min_width; columns];
    for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let align = |i: usize| aligns.get(i).copied().flatten();
    let line = |cells: Vec<String>| format!("| {} |", cells.join(" | "));
    let row_line = |row: &[String]| {
        line((0..columns)
            .map(|i| pad(row.get(i).map_or("", String::as_str), widths[i], align(i)))
            .collect())
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(row_line(header));
    lines.push(line(
        (0..columns).map(|i| separator(widths[i], align(i))).collect(),
    ));
    lines.extend(rows.iter().map(|row| row_line(row)));
    lines.join("\n")
}

fn pad(text: &str, width: usize, align: Option<Alignment>) -> String {
    let extra = width.saturating_sub(text.chars().count());
    match align {
        Some(Alignment::Right) => format!("{}{text}", " ".repeat(extra)),
        Some(Alignment::Center) => {
            let right = extra / 2;
            let left = extra - right;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
        }
        Some(Alignment::Left) | None => format!("{text}{}", " ".repeat(extra)),
    }
}

fn separator(width: usize, align: Option<Alignment>) -> String {
    match align {
        Some(Alignment::Left) => format!(":{}", "-".repeat(width - 1)),
        Some(Alignment::Right) => format!("{}:", "-".repeat(width - 1)),
        Some(Alignment::Center) => format!(":{}:", "-".repeat(width - 2)),
        None => "-".repeat(width),
    }
}
