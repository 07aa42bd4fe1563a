//! Output formatting for rows and serializable values.

use serde::Serialize;
use tablescope_core::Row;

use crate::table::{TableOptions, column_names, render_table, single_line};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Markdown,
    Json,
    Yaml,
}

/// A titled group of rows, for output made of several tables.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: String,
    pub rows: Vec<Row>,
}

impl Section {
    pub fn new(title: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
}

/// Formats rows in the requested output format.
///
/// `options` only affects [`OutputFormat::Table`].
pub fn format_rows(
    rows: &[Row],
    format: OutputFormat,
    options: &TableOptions,
) -> Result<String, String> {
    match format {
        OutputFormat::Json => to_json(rows),
        OutputFormat::Yaml => to_yaml(rows),
        OutputFormat::Markdown => Ok(rows_to_markdown(rows)),
        OutputFormat::Table => Ok(render_table(rows, options)),
    }
}

/// Formats several titled row groups.
///
/// Text formats print each section under its title; JSON and YAML emit a
/// list of `{title, rows}` objects. Empty sections are still listed.
pub fn format_sections(
    sections: &[Section],
    format: OutputFormat,
    options: &TableOptions,
) -> Result<String, String> {
    match format {
        OutputFormat::Json => to_json(sections),
        OutputFormat::Yaml => to_yaml(sections),
        OutputFormat::Markdown => {
            let mut out = String::new();
            for section in sections {
                out.push_str(&format!("## {}\n\n", section.title));
                if section.rows.is_empty() {
                    out.push_str("_none_\n\n");
                } else {
                    out.push_str(&rows_to_markdown(&section.rows));
                    out.push('\n');
                }
            }
            Ok(out)
        }
        OutputFormat::Table => {
            let mut out = String::new();
            for section in sections {
                out.push_str(&format!("{}:\n", section.title));
                if section.rows.is_empty() {
                    out.push_str("  (none)\n");
                } else {
                    out.push_str(&render_table(&section.rows, options));
                }
                out.push('\n');
            }
            Ok(out)
        }
    }
}

fn markdown_cell(text: &str) -> String {
    single_line(text).replace('|', "\\|")
}

fn rows_to_markdown(rows: &[Row]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let names = column_names(rows);
    let mut out = String::new();

    out.push('|');
    for name in &names {
        out.push_str(&format!(" {} |", markdown_cell(name)));
    }
    out.push_str("\n|");
    for _ in &names {
        out.push_str("---|");
    }
    out.push('\n');

    for row in rows {
        out.push('|');
        for name in &names {
            let text = row.try_get(name).map(|v| v.to_string()).unwrap_or_default();
            out.push_str(&format!(" {} |", markdown_cell(&text)));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablescope_core::Value;

    fn sample_rows() -> Vec<Row> {
        vec![
            Row::from_pairs(0, [("id", Value::Integer(1)), ("expr", Value::from("a|b"))]),
            Row::from_pairs(1, [("id", Value::Integer(2)), ("expr", Value::Null)]),
        ]
    }

    #[test]
    fn test_format_rows_json() {
        let json = format_rows(&sample_rows(), OutputFormat::Json, &TableOptions::default()).unwrap();
        assert!(json.contains("\"id\": 1"));
        assert!(json.contains("\"expr\": \"a|b\""));
        assert!(json.contains("\"expr\": null"));
    }

    #[test]
    fn test_format_rows_json_keeps_column_order() {
        let rows = vec![Row::from_pairs(0, [("z", Value::Integer(1)), ("a", Value::Integer(2))])];
        let json = format_rows(&rows, OutputFormat::Json, &TableOptions::default()).unwrap();
        assert!(json.find("\"z\"").unwrap() < json.find("\"a\"").unwrap());
    }

    #[test]
    fn test_format_rows_empty() {
        let options = TableOptions::default();
        assert_eq!(format_rows(&[], OutputFormat::Json, &options).unwrap(), "[]");
        assert_eq!(format_rows(&[], OutputFormat::Table, &options).unwrap(), "");
        assert_eq!(format_rows(&[], OutputFormat::Markdown, &options).unwrap(), "");
    }

    #[test]
    fn test_format_rows_yaml() {
        let yaml = format_rows(&sample_rows(), OutputFormat::Yaml, &TableOptions::default()).unwrap();
        assert!(yaml.contains("id: 1"));
        assert!(yaml.contains("expr: null"));
    }

    #[test]
    fn test_format_rows_markdown_escapes_pipes() {
        let md = format_rows(&sample_rows(), OutputFormat::Markdown, &TableOptions::default()).unwrap();
        let expected = "\
| id | expr |
|---|---|
| 1 | a\\|b |
| 2 |  |
";
        assert_eq!(md, expected);
    }

    #[test]
    fn test_format_sections_table() {
        let sections = vec![
            Section::new("Columns", sample_rows()),
            Section::new("Indices", Vec::new()),
        ];
        let out = format_sections(&sections, OutputFormat::Table, &TableOptions::default()).unwrap();
        assert!(out.starts_with("Columns:\n+----+"));
        assert!(out.contains("Indices:\n  (none)\n"));
    }

    #[test]
    fn test_format_sections_json() {
        let sections = vec![Section::new("Columns", sample_rows())];
        let out = format_sections(&sections, OutputFormat::Json, &TableOptions::default()).unwrap();
        assert!(out.contains("\"title\": \"Columns\""));
        assert!(out.contains("\"rows\": ["));
    }

    #[test]
    fn test_format_sections_markdown() {
        let sections = vec![Section::new("Indices", Vec::new())];
        let out = format_sections(&sections, OutputFormat::Markdown, &TableOptions::default()).unwrap();
        assert_eq!(out, "## Indices\n\n_none_\n\n");
    }
}
