//! Table column metadata from `PRAGMA table_info`.

use std::fmt;

use serde::Serialize;
use tablescope_core::{Field, Mapped, Row, Value};

/// One column of a table.
///
/// Columns are produced by [`Table::fetch_columns`](crate::Table::fetch_columns)
/// and are snapshots: fetching again yields new values. The owning table is
/// recorded by name only.
///
/// [`is_rowid`](Column::is_rowid) is resolved by the table loader: it is
/// `true` only for the single `INTEGER` primary key column that aliases
/// SQLite's rowid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    table: String,
    ordinal: i64,
    name: String,
    declared_type: String,
    not_null: bool,
    default_value: Value,
    primary_key_position: i64,
    is_rowid: bool,
}

impl Column {
    pub(crate) fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ordinal: 0,
            name: String::new(),
            declared_type: String::new(),
            not_null: false,
            default_value: Value::Null,
            primary_key_position: 0,
            is_rowid: false,
        }
    }

    /// Name of the owning table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Position in the table definition (`cid`).
    pub fn ordinal(&self) -> i64 {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type exactly as written in the table definition; empty when
    /// none was given.
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    /// Default value expression text, or `NULL` when the column has none.
    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    /// One-based position within the primary key, or `0` when the column is
    /// not part of it.
    pub fn primary_key_position(&self) -> i64 {
        self.primary_key_position
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key_position > 0
    }

    /// Returns `true` if the declared type is exactly `INTEGER` (any case).
    ///
    /// Only that spelling aliases the rowid; `INT` or `BIGINT` do not.
    pub fn is_integer_type(&self) -> bool {
        self.declared_type.eq_ignore_ascii_case("INTEGER")
    }

    /// Returns `true` if this column is an alias for the table's rowid.
    pub fn is_rowid(&self) -> bool {
        self.is_rowid
    }

    pub(crate) fn mark_rowid(&mut self) {
        self.is_rowid = true;
    }

    /// Renders this column as a row for display.
    pub fn to_row(&self, index: usize) -> Row {
        Row::from_pairs(
            index,
            [
                ("cid", Value::Integer(self.ordinal)),
                ("name", Value::from(self.name.as_str())),
                ("type", Value::from(self.declared_type.as_str())),
                ("notnull", Value::from(self.not_null)),
                ("dflt_value", self.default_value.clone()),
                ("pk", Value::Integer(self.primary_key_position)),
                ("rowid", Value::from(self.is_rowid)),
            ],
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Mapped for Column {
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("cid", |c, v| {
            c.ordinal = v.decode()?;
            Ok(())
        }),
        Field::new("name", |c, v| {
            c.name = v.decode()?;
            Ok(())
        }),
        Field::new("type", |c, v| {
            c.declared_type = v.decode::<Option<String>>()?.unwrap_or_default();
            Ok(())
        }),
        Field::new("notnull", |c, v| {
            c.not_null = v.decode()?;
            Ok(())
        }),
        Field::new("dflt_value", |c, v| {
            c.default_value = v.clone();
            Ok(())
        }),
        Field::new("pk", |c, v| {
            c.primary_key_position = v.decode()?;
            Ok(())
        }),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablescope_core::populate;

    fn table_info_row(name: &str, ty: &str, pk: i64) -> Row {
        Row::from_pairs(
            0,
            [
                ("cid", Value::Integer(0)),
                ("name", Value::from(name)),
                ("type", Value::from(ty)),
                ("notnull", Value::Integer(1)),
                ("dflt_value", Value::from("'x'")),
                ("pk", Value::Integer(pk)),
            ],
        )
    }

    #[test]
    fn test_populate_from_table_info_row() {
        let mut column = Column::new("t");
        populate(&mut column, &table_info_row("id", "integer", 1)).unwrap();
        assert_eq!(column.table(), "t");
        assert_eq!(column.name(), "id");
        assert_eq!(column.declared_type(), "integer");
        assert!(column.is_not_null());
        assert_eq!(column.default_value(), &Value::from("'x'"));
        assert!(column.is_primary_key());
        assert!(column.is_integer_type());
        assert!(!column.is_rowid());
    }

    #[test]
    fn test_non_pk_and_non_integer() {
        let mut column = Column::new("t");
        populate(&mut column, &table_info_row("n", "INT", 0)).unwrap();
        assert!(!column.is_primary_key());
        assert!(!column.is_integer_type());
    }

    #[test]
    fn test_to_row_includes_rowid_flag() {
        let mut column = Column::new("t");
        populate(&mut column, &table_info_row("id", "INTEGER", 1)).unwrap();
        column.mark_rowid();
        let row = column.to_row(4);
        assert_eq!(row.index(), 4);
        assert_eq!(row.get("rowid").unwrap(), &Value::Integer(1));
        assert_eq!(row.get("name").unwrap(), &Value::from("id"));
        assert_eq!(column.to_string(), "id");
    }
}
