//! SQLite catalog introspection.
//!
//! This crate reads a database's own description of itself
//! (`sqlite_master` and the `table_info`, `index_list` and `index_xinfo`
//! pragmas) into typed metadata, and works out which column, if any,
//! aliases each table's rowid.
//!
//! # Architecture
//!
//! - **`database`** — the connection wrapper; runs SQL and materializes rows
//! - **`load`** — per-call factory, filter and row limit for typed loads
//! - **`table`**, **`column`**, **`index`** — catalog metadata types
//! - **`rowid`** — rowid alias rules over fetched metadata
//! - **`snapshot`** — a table's columns and indices fetched in one pass
//! - **`schema`** — identifier escaping and catalog SQL
//! - **`config`** — YAML connection settings
//!
//! Metadata values are plain data. They name their owning table or index
//! instead of pointing at it, and every method that needs the engine takes
//! the [`Database`] explicitly.
//!
//! # Quick start
//!
//! ```
//! use tablescope_sqlite::Database;
//!
//! let db = Database::open_in_memory().unwrap();
//! db.execute_batch(
//!     "CREATE TABLE orders (customer INTEGER, line INTEGER, qty INTEGER,
//!                           PRIMARY KEY (customer, line));",
//! )
//! .unwrap();
//!
//! for table in db.tables().unwrap() {
//!     let schema = table.schema(&db).unwrap();
//!     let pk: Vec<&str> = schema.primary_key().iter().map(|c| c.name()).collect();
//!     assert_eq!(pk, ["customer", "line"]);
//!     assert!(schema.has_auto_rowid());
//! }
//! ```

mod column;
mod config;
mod convert;
mod database;
mod error;
mod index;
mod load;
pub mod rowid;
mod schema;
mod snapshot;
mod table;

pub use column::Column;
pub use config::DatabaseConfig;
pub use database::Database;
pub use error::{Result, SqliteError};
pub use index::{Index, IndexColumn, IndexOrigin};
pub use load::LoadOptions;
pub use schema::escape_name;
pub use snapshot::{IndexSchema, TableSchema};
pub use table::Table;
