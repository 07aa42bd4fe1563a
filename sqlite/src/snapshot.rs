//! Point-in-time schema snapshots.

use serde::Serialize;
use tablescope_core::eq_ignore_case;

use crate::column::Column;
use crate::index::{Index, IndexColumn, resolve_columns};
use crate::rowid;
use crate::table::Table;

/// An index together with its fetched columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSchema {
    #[serde(flatten)]
    index: Index,
    #[serde(rename = "columns")]
    index_columns: Vec<IndexColumn>,
}

impl IndexSchema {
    pub(crate) fn new(index: Index, index_columns: Vec<IndexColumn>) -> Self {
        Self {
            index,
            index_columns,
        }
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Every slot reported by `index_xinfo`, including the rowid slot.
    pub fn index_columns(&self) -> &[IndexColumn] {
        &self.index_columns
    }
}

/// Everything known about one table, fetched in a single pass by
/// [`Table::schema`].
///
/// Answers the same questions as the methods on [`Table`] without going
/// back to the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    table: Table,
    columns: Vec<Column>,
    indices: Vec<IndexSchema>,
}

impl TableSchema {
    pub(crate) fn new(table: Table, columns: Vec<Column>, indices: Vec<IndexSchema>) -> Self {
        Self {
            table,
            columns,
            indices,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn indices(&self) -> &[IndexSchema] {
        &self.indices
    }

    pub fn auto_primary_key(&self) -> Option<&IndexSchema> {
        self.indices
            .iter()
            .find(|i| i.index.is_auto_primary_key())
    }

    fn auto_pk_columns(&self) -> Option<&[IndexColumn]> {
        self.auto_primary_key().map(IndexSchema::index_columns)
    }

    /// Primary key columns, in table order.
    pub fn primary_key(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_primary_key()).collect()
    }

    pub fn rowid_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_rowid())
    }

    pub fn has_rowid(&self) -> bool {
        rowid::has_rowid(&self.columns, self.auto_pk_columns())
    }

    pub fn has_auto_rowid(&self) -> bool {
        rowid::has_auto_rowid(&self.columns, self.auto_pk_columns())
    }

    /// Finds a column by name, ignoring case.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| eq_ignore_case(c.name(), name))
    }

    /// Finds an index by name, ignoring case.
    pub fn get_index(&self, name: &str) -> Option<&IndexSchema> {
        self.indices
            .iter()
            .find(|i| eq_ignore_case(i.index.name(), name))
    }

    /// Resolves an index's slots to this table's columns, in index order.
    pub fn columns_of(&self, index: &IndexSchema) -> Vec<&Column> {
        resolve_columns(&index.index_columns, &self.columns)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    #[test]
    fn test_snapshot_matches_live_queries() {
        let db = Database::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE t (a INTEGER, b TEXT, c REAL, PRIMARY KEY (a, b));
             CREATE INDEX idx_t_cb ON t(c, B);",
        )
        .unwrap();
        let table = db.table("t").unwrap().unwrap();
        let schema = table.schema(&db).unwrap();

        assert_eq!(schema.columns(), table.fetch_columns(&db).unwrap());
        assert_eq!(schema.has_rowid(), table.has_rowid(&db).unwrap());
        assert_eq!(schema.has_auto_rowid(), table.has_auto_rowid(&db).unwrap());
        assert!(schema.rowid_column().is_none());

        let pk: Vec<&str> = schema.primary_key().iter().map(|c| c.name()).collect();
        assert_eq!(pk, ["a", "b"]);
        assert!(schema.auto_primary_key().is_some());

        let idx = schema.get_index("IDX_T_CB").unwrap();
        let names: Vec<&str> = schema.columns_of(idx).iter().map(|c| c.name()).collect();
        assert_eq!(names, ["c", "b"]);

        let live = table.get_index(&db, "idx_t_cb").unwrap().unwrap();
        let live_names: Vec<String> = live
            .columns(&db)
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(live_names, ["c", "b"]);
    }

    #[test]
    fn test_snapshot_rowid_alias() {
        let db = Database::open_in_memory().unwrap();
        db.execute_batch("CREATE TABLE t (ID integer PRIMARY KEY, v TEXT)")
            .unwrap();
        let schema = db.table("t").unwrap().unwrap().schema(&db).unwrap();
        assert_eq!(schema.rowid_column().unwrap().name(), "ID");
        assert_eq!(schema.get_column("id").unwrap().name(), "ID");
        assert!(schema.has_rowid());
        assert!(!schema.has_auto_rowid());
        assert!(schema.indices().is_empty());
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let db = Database::open_in_memory().unwrap();
        db.execute_batch("CREATE TABLE t (k TEXT PRIMARY KEY) WITHOUT ROWID")
            .unwrap();
        let schema = db.table("t").unwrap().unwrap().schema(&db).unwrap();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["table"]["name"], "t");
        assert_eq!(json["columns"][0]["name"], "k");
        assert_eq!(json["indices"][0]["origin"], "pk");
        assert!(json["indices"][0]["columns"].is_array());
    }
}
