//! Aligned text tables.
//!
//! ```text
//! +----+-------+
//! | id | name  |
//! +----+-------+
//! |  1 | alice |
//! |  2 | bob   |
//! +----+-------+
//! ```

use tablescope_core::{Row, Value, eq_ignore_case};

const ELLIPSIS: &str = "...";

/// Layout options for [`render_table`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableOptions {
    /// Truncate cells (and headers) to this many characters, ending in
    /// `...`. `None` never truncates.
    pub max_cell_width: Option<usize>,
    /// Prepend a `#` column holding each row's position in its result set.
    pub show_row_index: bool,
}

struct Cell {
    text: String,
    right_align: bool,
}

/// Union of the rows' column names in first-seen order.
///
/// Names that differ only in case are the same column; the first spelling
/// wins.
pub fn column_names(rows: &[Row]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for row in rows {
        for (name, _) in row {
            if !names.iter().any(|n| eq_ignore_case(n, name)) {
                names.push(name);
            }
        }
    }
    names
}

/// Replaces control characters (newlines, tabs) so a cell stays on one line.
pub(crate) fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn truncate(text: String, max: Option<usize>) -> String {
    let Some(max) = max else {
        return text;
    };
    if text.chars().count() <= max {
        return text;
    }
    if max <= ELLIPSIS.len() {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

fn value_cell(value: Option<&Value>, options: &TableOptions) -> Cell {
    match value {
        Some(value) => Cell {
            text: truncate(single_line(&value.to_string()), options.max_cell_width),
            right_align: value.is_numeric(),
        },
        None => Cell {
            text: String::new(),
            right_align: false,
        },
    }
}

fn push_border(out: &mut String, widths: &[usize]) {
    out.push('+');
    for width in widths {
        out.push_str(&"-".repeat(width + 2));
        out.push('+');
    }
    out.push('\n');
}

fn push_line(out: &mut String, cells: &[Cell], widths: &[usize]) {
    out.push('|');
    for (cell, &width) in cells.iter().zip(widths) {
        if cell.right_align {
            out.push_str(&format!(" {:>width$} |", cell.text));
        } else {
            out.push_str(&format!(" {:<width$} |", cell.text));
        }
    }
    out.push('\n');
}

/// Renders rows as a bordered text table.
///
/// Numeric cells are right-aligned, everything else left-aligned. Rows
/// lacking one of the columns get an empty cell. No rows render as an empty
/// string.
pub fn render_table(rows: &[Row], options: &TableOptions) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let names = column_names(rows);

    let mut header = Vec::with_capacity(names.len() + 1);
    if options.show_row_index {
        header.push(Cell {
            text: "#".to_string(),
            right_align: false,
        });
    }
    header.extend(names.iter().map(|name| Cell {
        text: truncate(single_line(name), options.max_cell_width),
        right_align: false,
    }));

    let body: Vec<Vec<Cell>> = rows
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(header.len());
            if options.show_row_index {
                cells.push(Cell {
                    text: row.index().to_string(),
                    right_align: true,
                });
            }
            cells.extend(
                names
                    .iter()
                    .map(|name| value_cell(row.try_get(name), options)),
            );
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|c| c.text.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.text.chars().count());
        }
    }

    let mut out = String::new();
    push_border(&mut out, &widths);
    push_line(&mut out, &header, &widths);
    push_border(&mut out, &widths);
    for cells in &body {
        push_line(&mut out, cells, &widths);
    }
    push_border(&mut out, &widths);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vec<Row> {
        vec![
            Row::from_pairs(0, [("id", Value::Integer(1)), ("name", Value::from("alice"))]),
            Row::from_pairs(1, [("id", Value::Integer(22)), ("name", Value::from("bob"))]),
        ]
    }

    #[test]
    fn test_render_aligned_table() {
        let out = render_table(&people(), &TableOptions::default());
        let expected = "\
+----+-------+
| id | name  |
+----+-------+
|  1 | alice |
| 22 | bob   |
+----+-------+
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_empty_is_empty_string() {
        assert_eq!(render_table(&[], &TableOptions::default()), "");
    }

    #[test]
    fn test_row_index_column() {
        let options = TableOptions {
            show_row_index: true,
            ..TableOptions::default()
        };
        let out = render_table(&people(), &options);
        assert!(out.contains("| # | id | name  |"));
        assert!(out.contains("| 1 | 22 | bob   |"));
    }

    #[test]
    fn test_truncates_long_cells() {
        let rows = vec![Row::from_pairs(0, [("note", "abcdefghijkl")])];
        let options = TableOptions {
            max_cell_width: Some(8),
            ..TableOptions::default()
        };
        let out = render_table(&rows, &options);
        assert!(out.contains("| abcde... |"));
        assert!(!out.contains("abcdefghijkl"));
    }

    #[test]
    fn test_truncate_narrower_than_ellipsis() {
        assert_eq!(truncate("abcdef".to_string(), Some(2)), "ab");
        assert_eq!(truncate("abc".to_string(), Some(3)), "abc");
        assert_eq!(truncate("abc".to_string(), None), "abc");
    }

    #[test]
    fn test_newlines_become_spaces() {
        let rows = vec![Row::from_pairs(0, [("sql", "CREATE TABLE t (\n  a\n)")])];
        let out = render_table(&rows, &TableOptions::default());
        assert!(out.contains("| CREATE TABLE t (   a ) |"));
        assert_eq!(out.lines().count(), 5);
    }

    #[test]
    fn test_heterogeneous_rows_union_columns() {
        let rows = vec![
            Row::from_pairs(0, [("a", Value::Integer(1))]),
            Row::from_pairs(1, [("A", Value::Integer(2)), ("b", Value::from("x"))]),
        ];
        assert_eq!(column_names(&rows), ["a", "b"]);
        let out = render_table(&rows, &TableOptions::default());
        assert!(out.contains("| a | b |"));
        assert!(out.contains("| 1 |   |"));
        assert!(out.contains("| 2 | x |"));
    }

    #[test]
    fn test_null_and_blob_cells() {
        let rows = vec![Row::from_pairs(
            0,
            [("n", Value::Null), ("b", Value::Blob(vec![0xca, 0xfe]))],
        )];
        let out = render_table(&rows, &TableOptions::default());
        assert!(out.contains("|   | x'cafe' |"));
    }
}
