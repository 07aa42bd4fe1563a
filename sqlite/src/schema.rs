//! SQL text generation for catalog queries.
//!
//! Pragmas take identifiers, not bound parameters, so table and index names
//! have to be embedded in the statement text. Every name goes through
//! [`escape_name`] first; nothing in this crate interpolates a raw name.
//!
//! # Catalog surface
//!
//! - `sqlite_master(type, name, tbl_name, rootpage, sql)`
//! - `PRAGMA table_info` → `(cid, name, type, notnull, dflt_value, pk)`
//! - `PRAGMA index_list` → `(seq, name, unique, origin, partial)`
//! - `PRAGMA index_xinfo` → `(seqno, cid, name, desc, coll, key)`

/// Quotes an identifier for SQLite.
///
/// Wraps the name in double quotes and doubles any embedded double quote,
/// which is the engine's identifier-quoting rule. Safe for names taken from
/// untrusted input.
///
/// # Examples
///
/// ```
/// use tablescope_sqlite::escape_name;
///
/// assert_eq!(escape_name("users"), r#""users""#);
/// assert_eq!(escape_name(r#"a"b"#), r#""a""b""#);
/// ```
pub fn escape_name(name: &str) -> String {
    let escaped = name.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

pub(crate) fn table_info_sql(table: &str) -> String {
    format!("PRAGMA table_info({})", escape_name(table))
}

pub(crate) fn index_list_sql(table: &str) -> String {
    format!("PRAGMA index_list({})", escape_name(table))
}

pub(crate) fn index_xinfo_sql(index: &str) -> String {
    format!("PRAGMA index_xinfo({})", escape_name(index))
}

pub(crate) fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", escape_name(table))
}

pub(crate) const SCHEMA_OBJECTS_SQL: &str =
    "SELECT type, name, tbl_name, rootpage, sql FROM sqlite_master ORDER BY type, name";

pub(crate) const TABLES_SQL: &str = "SELECT type, name, tbl_name, rootpage, sql FROM sqlite_master \
     WHERE type = 'table' ORDER BY name";

pub(crate) const TABLE_BY_NAME_SQL: &str = "SELECT type, name, tbl_name, rootpage, sql FROM sqlite_master \
     WHERE type = 'table' AND name = ?1 COLLATE NOCASE LIMIT 1";
