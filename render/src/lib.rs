//! Renders result rows for humans and tools.
//!
//! Rows from `tablescope-sqlite` (and metadata converted with `to_row`) are
//! formatted as bordered text tables, GitHub Markdown tables, JSON or YAML.
//! Heterogeneous row sequences are fine: the rendered columns are the union
//! of every row's names.
//!
//! ```
//! use tablescope_core::{Row, Value};
//! use tablescope_render::{OutputFormat, TableOptions, format_rows};
//!
//! let rows = vec![Row::from_pairs(0, [("id", Value::Integer(7))])];
//! let text = format_rows(&rows, OutputFormat::Table, &TableOptions::default()).unwrap();
//! assert!(text.contains("|  7 |"));
//! ```

mod output;
mod table;

pub use output::{OutputFormat, Section, format_rows, format_sections, to_json, to_yaml};
pub use table::{TableOptions, column_names, render_table};
