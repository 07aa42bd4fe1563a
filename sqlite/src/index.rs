//! Index metadata from `PRAGMA index_list` and `PRAGMA index_xinfo`.

use std::fmt;

use serde::{Serialize, Serializer};
use tablescope_core::{Field, Mapped, Row, Value, eq_ignore_case};

use crate::column::Column;
use crate::database::Database;
use crate::error::Result;
use crate::load::LoadOptions;
use crate::schema::index_xinfo_sql;
use crate::table::Table;

/// `cid` reported by `index_xinfo` for the rowid slot.
const ROWID_CID: i64 = -1;
/// `cid` reported by `index_xinfo` for an expression column.
const EXPRESSION_CID: i64 = -2;

/// How an index came to exist.
///
/// # Examples
///
/// ```
/// use tablescope_sqlite::IndexOrigin;
///
/// assert_eq!(IndexOrigin::from_code("pk"), IndexOrigin::PrimaryKey);
/// assert_eq!(IndexOrigin::from_code("c").code(), "c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IndexOrigin {
    /// Declared with `CREATE INDEX` (`"c"`).
    #[default]
    CreateIndex,
    /// Created automatically for a `UNIQUE` constraint (`"u"`).
    Unique,
    /// Created automatically for a `PRIMARY KEY` constraint (`"pk"`).
    PrimaryKey,
    /// An origin code this crate does not know.
    Other(String),
}

impl IndexOrigin {
    pub fn from_code(code: &str) -> Self {
        match code {
            "c" => Self::CreateIndex,
            "u" => Self::Unique,
            "pk" => Self::PrimaryKey,
            other => Self::Other(other.to_string()),
        }
    }

    /// The engine's short code for this origin.
    pub fn code(&self) -> &str {
        match self {
            Self::CreateIndex => "c",
            Self::Unique => "u",
            Self::PrimaryKey => "pk",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for IndexOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for IndexOrigin {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// One index on a table.
///
/// Like [`Column`], an `Index` is a snapshot that names its table instead of
/// pointing at it. Its column list is fetched on demand.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Index {
    table: String,
    ordinal: i64,
    name: String,
    is_unique: bool,
    origin: IndexOrigin,
    is_partial: bool,
}

impl Index {
    pub(crate) fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// Name of the indexed table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Position among the table's indices (`seq`).
    pub fn ordinal(&self) -> i64 {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_unique(&self) -> bool {
        self.is_unique
    }

    pub fn origin(&self) -> &IndexOrigin {
        &self.origin
    }

    /// Returns `true` for the index SQLite created to back a primary key.
    pub fn is_auto_primary_key(&self) -> bool {
        self.origin == IndexOrigin::PrimaryKey
    }

    pub fn is_partial(&self) -> bool {
        self.is_partial
    }

    /// Queries `PRAGMA index_xinfo` for this index.
    ///
    /// Includes auxiliary columns and the rowid slot; nothing is cached.
    pub fn fetch_index_columns(&self, db: &Database) -> Result<Vec<IndexColumn>> {
        let options = LoadOptions::new(|_| IndexColumn::new(&self.name));
        db.load(&index_xinfo_sql(&self.name), &options)
    }

    /// Resolves this index's columns to the owning table's [`Column`]s.
    ///
    /// Index columns are taken in index order. Entries without a name (the
    /// rowid slot, expressions) and names the table does not define are
    /// skipped, so the result may be shorter than
    /// [`fetch_index_columns`](Index::fetch_index_columns).
    pub fn columns(&self, db: &Database) -> Result<Vec<Column>> {
        let index_columns = self.fetch_index_columns(db)?;
        let table_columns = Table::named(&self.table).fetch_columns(db)?;
        Ok(resolve_columns(&index_columns, &table_columns)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Renders this index as a row for display.
    pub fn to_row(&self, index: usize) -> Row {
        Row::from_pairs(
            index,
            [
                ("seq", Value::Integer(self.ordinal)),
                ("name", Value::from(self.name.as_str())),
                ("unique", Value::from(self.is_unique)),
                ("origin", Value::from(self.origin.code())),
                ("partial", Value::from(self.is_partial)),
            ],
        )
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Mapped for Index {
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("seq", |i, v| {
            i.ordinal = v.decode()?;
            Ok(())
        }),
        Field::new("name", |i, v| {
            i.name = v.decode()?;
            Ok(())
        }),
        Field::new("unique", |i, v| {
            i.is_unique = v.decode()?;
            Ok(())
        }),
        Field::new("origin", |i, v| {
            i.origin = IndexOrigin::from_code(&v.decode::<String>()?);
            Ok(())
        }),
        Field::new("partial", |i, v| {
            i.is_partial = v.decode()?;
            Ok(())
        }),
    ];
}

/// One column slot of an index.
///
/// Sort by [`ordinal`](IndexColumn::ordinal) for the index's canonical
/// column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IndexColumn {
    index: String,
    ordinal: i64,
    table_ordinal: i64,
    name: Option<String>,
    is_descending: bool,
    collation: Option<String>,
    is_key: bool,
}

impl IndexColumn {
    pub(crate) fn new(index: &str) -> Self {
        Self {
            index: index.to_string(),
            ..Self::default()
        }
    }

    /// Name of the owning index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Position within the index (`seqno`).
    pub fn ordinal(&self) -> i64 {
        self.ordinal
    }

    /// Position of the column in its table (`cid`); negative for the rowid
    /// slot and for expressions.
    pub fn table_ordinal(&self) -> i64 {
        self.table_ordinal
    }

    /// Column name; `None` for the rowid slot and for expressions.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_descending(&self) -> bool {
        self.is_descending
    }

    pub fn collation(&self) -> Option<&str> {
        self.collation.as_deref()
    }

    /// `true` for key columns, `false` for auxiliary columns the engine
    /// appends to the index record.
    pub fn is_key(&self) -> bool {
        self.is_key
    }

    /// Returns `true` if the engine reports this slot as the table's rowid.
    pub fn is_rowid(&self) -> bool {
        self.table_ordinal == ROWID_CID
    }

    pub fn is_expression(&self) -> bool {
        self.table_ordinal == EXPRESSION_CID
    }

    /// Renders this index column as a row for display.
    pub fn to_row(&self, index: usize) -> Row {
        Row::from_pairs(
            index,
            [
                ("seqno", Value::Integer(self.ordinal)),
                ("cid", Value::Integer(self.table_ordinal)),
                ("name", Value::from(self.name.clone())),
                ("desc", Value::from(self.is_descending)),
                ("coll", Value::from(self.collation.clone())),
                ("key", Value::from(self.is_key)),
            ],
        )
    }
}

impl Mapped for IndexColumn {
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("seqno", |c, v| {
            c.ordinal = v.decode()?;
            Ok(())
        }),
        Field::new("cid", |c, v| {
            c.table_ordinal = v.decode()?;
            Ok(())
        }),
        Field::new("name", |c, v| {
            c.name = v.decode()?;
            Ok(())
        }),
        Field::new("desc", |c, v| {
            c.is_descending = v.decode()?;
            Ok(())
        }),
        Field::new("coll", |c, v| {
            c.collation = v.decode()?;
            Ok(())
        }),
        Field::new("key", |c, v| {
            c.is_key = v.decode()?;
            Ok(())
        }),
    ];
}

/// Maps index columns onto table columns, in index order.
pub(crate) fn resolve_columns<'c>(
    index_columns: &[IndexColumn],
    table_columns: &'c [Column],
) -> Vec<&'c Column> {
    let mut ordered: Vec<&IndexColumn> = index_columns.iter().collect();
    ordered.sort_by_key(|c| c.ordinal);
    ordered
        .into_iter()
        .filter_map(|ic| ic.name())
        .filter_map(|name| table_columns.iter().find(|c| eq_ignore_case(c.name(), name)))
        .collect()
}
