//! The database collaborator: statement execution and materialization.
//!
//! [`Database`] owns a single [`Connection`] and is the only place that
//! talks to the engine. Catalog types ([`Table`], [`Index`](crate::Index))
//! take it as an argument for each query they issue.
//!
//! # Example
//!
//! ```
//! use tablescope_sqlite::Database;
//!
//! let db = Database::open_in_memory().unwrap();
//! db.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);
//!                   INSERT INTO t (name) VALUES ('a'), ('b');").unwrap();
//!
//! let rows = db.execute("SELECT id, name FROM t ORDER BY id").unwrap();
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[1].get_as::<String>("NAME").unwrap(), "b");
//!
//! let tables = db.tables().unwrap();
//! assert_eq!(tables[0].name(), "t");
//! ```

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, Params};
use tablescope_core::{Mapped, Row, Value, populate};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::convert;
use crate::error::{Result, SqliteError};
use crate::load::LoadOptions;
use crate::schema::{self, SCHEMA_OBJECTS_SQL, TABLE_BY_NAME_SQL, TABLES_SQL};
use crate::table::Table;

/// A SQLite database connection with row and catalog access.
///
/// A `Database` is `Send` but not `Sync`: hand it to another thread whole,
/// or open one per thread. Nothing here caches catalog data; every call
/// round-trips to the engine.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: None,
        })
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn, path: None }
    }

    /// Opens a database as described by `config`.
    ///
    /// Read-only files are opened without the create flag, so a missing
    /// file is an error instead of a new empty database.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let db = match &config.path {
            Some(path) if config.read_only => {
                let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX;
                let conn = Connection::open_with_flags(path, flags)?;
                Self {
                    conn,
                    path: Some(path.clone()),
                }
            }
            Some(path) => Self::open(path)?,
            None => Self::open_in_memory()?,
        };
        db.conn.busy_timeout(config.busy_timeout())?;
        db.conn.execute_batch(if config.foreign_keys {
            "PRAGMA foreign_keys = ON;"
        } else {
            "PRAGMA foreign_keys = OFF;"
        })?;
        debug!(path = ?db.path, read_only = config.read_only, "Opened database");
        Ok(db)
    }

    /// Path of the database file, if it was opened from one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the database and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    fn query_with<P, F>(&self, sql: &str, params: P, mut f: F) -> Result<()>
    where
        P: Params,
        F: FnMut(Row) -> Result<ControlFlow<()>>,
    {
        debug!(sql = %sql, "Executing statement");
        let mut stmt = self.conn.prepare(sql)?;
        let names = convert::column_names(&stmt);
        let mut rows = stmt.query(params)?;
        let mut index = 0;
        while let Some(row) = rows.next()? {
            let row = convert::read_row(row, index, &names)?;
            if f(row)?.is_break() {
                break;
            }
            index += 1;
        }
        Ok(())
    }

    /// Streams the rows of `sql` into `f` without buffering them.
    ///
    /// Return [`ControlFlow::Break`] from `f` to stop early.
    pub fn for_each_row<F>(&self, sql: &str, f: F) -> Result<()>
    where
        F: FnMut(Row) -> Result<ControlFlow<()>>,
    {
        self.query_with(sql, [], f)
    }

    /// Runs `sql` and returns every result row, in order.
    ///
    /// Each [`Row`] carries its zero-based position and the statement's
    /// column names. Statements without result columns return an empty
    /// vector after running.
    pub fn execute(&self, sql: &str) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        self.for_each_row(sql, |row| {
            rows.push(row);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(rows)
    }

    /// Runs one or more statements that produce no rows.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        debug!(sql = %sql, "Executing batch");
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Returns the first column of the first row, or `None` for no rows.
    pub fn execute_scalar(&self, sql: &str) -> Result<Option<Value>> {
        let mut first = None;
        self.for_each_row(sql, |row| {
            first = row.values().first().cloned();
            Ok(ControlFlow::Break(()))
        })?;
        Ok(first)
    }

    /// Materializes the rows of `sql` as `T`s.
    ///
    /// For each row: the options' filter runs first, then the factory
    /// builds a blank instance, then `T`'s mapping table fills it in.
    ///
    /// # Errors
    ///
    /// Engine errors pass through as [`SqliteError::DatabaseError`];
    /// decoding failures surface as [`SqliteError::Core`].
    pub fn load<T: Mapped>(&self, sql: &str, options: &LoadOptions<'_, T>) -> Result<Vec<T>> {
        let mut items = Vec::new();
        if options.max_rows() == Some(0) {
            return Ok(items);
        }
        self.query_with(sql, [], |row| {
            if !options.accepts(&row) {
                return Ok(ControlFlow::Continue(()));
            }
            let mut item = options.create(&row);
            populate(&mut item, &row)?;
            items.push(item);
            if options.max_rows().is_some_and(|max| items.len() >= max) {
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(items)
    }

    /// Drops the named table if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidArgument`] for a blank name.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SqliteError::invalid_argument("name", "table name is blank"));
        }
        self.execute_batch(&schema::drop_table_sql(name))
    }

    /// Lists the tables in `sqlite_master`, ordered by name.
    pub fn tables(&self) -> Result<Vec<Table>> {
        self.load(TABLES_SQL, &LoadOptions::default())
    }

    /// Lists every `sqlite_master` entry: tables, indices, views and
    /// triggers.
    pub fn schema_objects(&self) -> Result<Vec<Table>> {
        self.load(SCHEMA_OBJECTS_SQL, &LoadOptions::default())
    }

    /// Finds a table by name, ignoring case.
    pub fn table(&self, name: &str) -> Result<Option<Table>> {
        let mut found = None;
        self.query_with(TABLE_BY_NAME_SQL, [name], |row| {
            let mut table = Table::default();
            populate(&mut table, &row)?;
            found = Some(table);
            Ok(ControlFlow::Break(()))
        })?;
        Ok(found)
    }

    pub fn table_exists(&self, name: &str) -> Result<bool> {
        Ok(self.table(name)?.is_some())
    }
}
