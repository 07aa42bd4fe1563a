//! Conversion from rusqlite result rows to [`Row`]s.
//!
//! Values are copied out of the statement immediately, so a [`Row`] stays
//! valid after the cursor moves on. Column names are read once per
//! statement and shared by every row it produces.

use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::ValueRef;
use tablescope_core::{Row, Value};

/// Copies a borrowed engine value into an owned [`Value`].
///
/// Text that is not valid UTF-8 is converted lossily rather than rejected;
/// SQLite does not enforce encoding on stored text.
pub(crate) fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

/// Result column names of a prepared statement.
pub(crate) fn column_names(stmt: &Statement<'_>) -> Arc<[String]> {
    stmt.column_names().into_iter().map(String::from).collect()
}

/// Reads one engine row at position `index`.
pub(crate) fn read_row(
    row: &rusqlite::Row<'_>,
    index: usize,
    names: &Arc<[String]>,
) -> rusqlite::Result<Row> {
    let mut values = Vec::with_capacity(names.len());
    for i in 0..names.len() {
        values.push(value_from_ref(row.get_ref(i)?));
    }
    Ok(Row::new(index, Arc::clone(names), values))
}
