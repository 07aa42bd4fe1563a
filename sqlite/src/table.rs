//! Table metadata: the root of catalog introspection.
//!
//! A [`Table`] is one `sqlite_master` entry. Everything else (columns,
//! indices, primary key and rowid status) is derived from the live database
//! on each call:
//!
//! ```
//! use tablescope_sqlite::Database;
//!
//! let db = Database::open_in_memory().unwrap();
//! db.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)").unwrap();
//!
//! let table = db.table("t").unwrap().unwrap();
//! let columns = table.fetch_columns(&db).unwrap();
//! assert_eq!(columns.len(), 2);
//! assert!(columns[0].is_rowid());
//! assert!(table.has_rowid(&db).unwrap());
//! assert!(!table.has_auto_rowid(&db).unwrap());
//! ```

use std::fmt;

use serde::Serialize;
use tablescope_core::{Field, Mapped, Row, Value, eq_ignore_case};
use tracing::debug;

use crate::column::Column;
use crate::database::Database;
use crate::error::Result;
use crate::index::{Index, IndexColumn};
use crate::load::LoadOptions;
use crate::rowid;
use crate::schema::{index_list_sql, table_info_sql};
use crate::snapshot::{IndexSchema, TableSchema};

/// A `sqlite_master` entry, usually a table.
///
/// Every accessor that takes a [`Database`] re-queries the engine; nothing
/// is memoized, so calling [`has_rowid`](Table::has_rowid) twice runs its
/// pragmas twice. Use [`schema`](Table::schema) to fetch everything once
/// into a [`TableSchema`] when several derived facts are needed together.
///
/// A blank name yields empty column and index lists without touching the
/// database.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Table {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    #[serde(rename = "tbl_name")]
    table_name: String,
    #[serde(rename = "rootpage")]
    root_page: Option<i64>,
    sql: Option<String>,
}

impl Table {
    /// A table entry known only by name, without a catalog lookup.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: "table".to_string(),
            table_name: name.clone(),
            name,
            root_page: None,
            sql: None,
        }
    }

    /// Catalog object type: `table`, `index`, `view` or `trigger`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table the entry belongs to (`tbl_name`); equals [`name`](Table::name)
    /// for tables.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn root_page(&self) -> Option<i64> {
        self.root_page
    }

    /// The `CREATE` statement, or `None` for automatic indices.
    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }

    fn load_columns(&self, db: &Database) -> Result<Vec<Column>> {
        let options = LoadOptions::new(|_| Column::new(&self.name));
        db.load(&table_info_sql(&self.name), &options)
    }

    /// Queries `PRAGMA table_info` and resolves the rowid alias.
    ///
    /// At most one returned column has [`Column::is_rowid`] set.
    pub fn fetch_columns(&self, db: &Database) -> Result<Vec<Column>> {
        if self.is_blank() {
            return Ok(Vec::new());
        }
        let mut columns = self.load_columns(db)?;
        let auto_pk = self.auto_primary_key_columns(db)?;
        if rowid::resolve_rowid(&mut columns, auto_pk.as_deref()).is_none() {
            debug!(table = %self.name, "No rowid alias column");
        }
        Ok(columns)
    }

    /// Queries `PRAGMA index_list`.
    pub fn fetch_indices(&self, db: &Database) -> Result<Vec<Index>> {
        if self.is_blank() {
            return Ok(Vec::new());
        }
        let options = LoadOptions::new(|_| Index::new(&self.name));
        db.load(&index_list_sql(&self.name), &options)
    }

    /// The index SQLite created to back the primary key, if any.
    pub fn auto_primary_key(&self, db: &Database) -> Result<Option<Index>> {
        Ok(self
            .fetch_indices(db)?
            .into_iter()
            .find(Index::is_auto_primary_key))
    }

    fn auto_primary_key_columns(&self, db: &Database) -> Result<Option<Vec<IndexColumn>>> {
        self.auto_primary_key(db)?
            .map(|index| index.fetch_index_columns(db))
            .transpose()
    }

    /// Primary key columns, in table order.
    pub fn primary_key(&self, db: &Database) -> Result<Vec<Column>> {
        let mut columns = self.fetch_columns(db)?;
        columns.retain(Column::is_primary_key);
        Ok(columns)
    }

    /// Returns `true` if the table has a rowid, declared or implicit.
    ///
    /// Only an aliasing column or the rowid slot of the automatic
    /// primary-key index counts, so a table declared without any primary
    /// key reports `false`.
    pub fn has_rowid(&self, db: &Database) -> Result<bool> {
        let columns = self.fetch_columns(db)?;
        let auto_pk = self.auto_primary_key_columns(db)?;
        Ok(rowid::has_rowid(&columns, auto_pk.as_deref()))
    }

    /// Returns `true` if the table's rowid is implicit: present, but not
    /// aliased by any column.
    pub fn has_auto_rowid(&self, db: &Database) -> Result<bool> {
        let columns = self.fetch_columns(db)?;
        let auto_pk = self.auto_primary_key_columns(db)?;
        Ok(rowid::has_auto_rowid(&columns, auto_pk.as_deref()))
    }

    /// Finds a column by name, ignoring case.
    pub fn get_column(&self, db: &Database, name: &str) -> Result<Option<Column>> {
        Ok(self
            .fetch_columns(db)?
            .into_iter()
            .find(|c| eq_ignore_case(c.name(), name)))
    }

    /// Finds an index by name, ignoring case.
    pub fn get_index(&self, db: &Database, name: &str) -> Result<Option<Index>> {
        Ok(self
            .fetch_indices(db)?
            .into_iter()
            .find(|i| eq_ignore_case(i.name(), name)))
    }

    /// Drops this table.
    pub fn delete(&self, db: &Database) -> Result<()> {
        db.drop_table(&self.name)
    }

    /// Fetches columns, indices and index columns once.
    ///
    /// The snapshot answers the same questions as the methods on `Table`
    /// without further queries. It does not track later schema changes;
    /// take a new one after DDL.
    pub fn schema(&self, db: &Database) -> Result<TableSchema> {
        let mut indices = Vec::new();
        for index in self.fetch_indices(db)? {
            let index_columns = index.fetch_index_columns(db)?;
            indices.push(IndexSchema::new(index, index_columns));
        }

        let mut columns = if self.is_blank() {
            Vec::new()
        } else {
            self.load_columns(db)?
        };
        let auto_pk = indices
            .iter()
            .find(|i| i.index().is_auto_primary_key())
            .map(IndexSchema::index_columns);
        rowid::resolve_rowid(&mut columns, auto_pk);

        Ok(TableSchema::new(self.clone(), columns, indices))
    }

    /// Renders this catalog entry as a row for display.
    pub fn to_row(&self, index: usize) -> Row {
        Row::from_pairs(
            index,
            [
                ("type", Value::from(self.kind.as_str())),
                ("name", Value::from(self.name.as_str())),
                ("tbl_name", Value::from(self.table_name.as_str())),
                ("rootpage", Value::from(self.root_page)),
                ("sql", Value::from(self.sql.clone())),
            ],
        )
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Mapped for Table {
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("type", |t, v| {
            t.kind = v.decode()?;
            Ok(())
        }),
        Field::new("name", |t, v| {
            t.name = v.decode()?;
            Ok(())
        }),
        Field::new("tbl_name", |t, v| {
            t.table_name = v.decode()?;
            Ok(())
        }),
        Field::new("rootpage", |t, v| {
            t.root_page = v.decode()?;
            Ok(())
        }),
        Field::new("sql", |t, v| {
            t.sql = v.decode()?;
            Ok(())
        }),
    ];
}
