//! Integration tests for the tablescope-sqlite crate.

use std::path::{Path, PathBuf};

use tablescope_core::Value;
use tablescope_sqlite::{Database, DatabaseConfig, IndexOrigin, SqliteError, Table, escape_name};
use tempfile::TempDir;

/// A music catalog with every primary key flavour the rowid rules care about.
const CATALOG_SQL: &str = r#"
CREATE TABLE artists (
    artist_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);
CREATE TABLE albums (
    album_id INTEGER PRIMARY KEY,
    artist_id INTEGER NOT NULL REFERENCES artists(artist_id),
    title TEXT NOT NULL DEFAULT 'untitled',
    released INT
);
CREATE INDEX idx_albums_artist ON albums(artist_id, title DESC);
CREATE TABLE tracks (
    album_id INTEGER,
    position INTEGER,
    name TEXT,
    PRIMARY KEY (album_id, position)
);
CREATE TABLE genres (
    code TEXT PRIMARY KEY,
    label TEXT UNIQUE
) WITHOUT ROWID;
CREATE TABLE plays (at TEXT, track TEXT);
INSERT INTO artists (name) VALUES ('Low'), ('Slint');
INSERT INTO albums (artist_id, title, released) VALUES (1, 'Things We Lost', 2001), (2, 'Spiderland', 1991);
"#;

fn catalog_db(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("catalog.db");
    let db = Database::open(&path).unwrap();
    db.execute_batch(CATALOG_SQL).unwrap();
    path
}

fn open(path: &Path) -> Database {
    Database::open(path).unwrap()
}

fn table(db: &Database, name: &str) -> Table {
    db.table(name).unwrap().unwrap()
}

#[test]
fn test_tables_sorted_by_name() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));
    let names: Vec<String> = db
        .tables()
        .unwrap()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(names, ["albums", "artists", "genres", "plays", "tracks"]);
}

#[test]
fn test_integer_primary_key_is_rowid_alias() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));
    let artists = table(&db, "artists");

    let columns = artists.fetch_columns(&db).unwrap();
    let rowids: Vec<&str> = columns
        .iter()
        .filter(|c| c.is_rowid())
        .map(|c| c.name())
        .collect();
    assert_eq!(rowids, ["artist_id"]);
    assert!(artists.has_rowid(&db).unwrap());
    assert!(!artists.has_auto_rowid(&db).unwrap());
    assert!(artists.auto_primary_key(&db).unwrap().is_none());
}

#[test]
fn test_composite_primary_key_keeps_implicit_rowid() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));
    let tracks = table(&db, "tracks");

    let pk: Vec<String> = tracks
        .primary_key(&db)
        .unwrap()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(pk, ["album_id", "position"]);
    assert!(tracks.fetch_columns(&db).unwrap().iter().all(|c| !c.is_rowid()));
    assert!(tracks.has_rowid(&db).unwrap());
    assert!(tracks.has_auto_rowid(&db).unwrap());

    let auto_pk = tracks.auto_primary_key(&db).unwrap().unwrap();
    assert_eq!(auto_pk.origin(), &IndexOrigin::PrimaryKey);
    let slots = auto_pk.fetch_index_columns(&db).unwrap();
    assert!(slots.iter().any(|s| s.is_rowid() && s.name().is_none()));
}

#[test]
fn test_without_rowid_table() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));
    let genres = table(&db, "genres");

    assert!(!genres.has_rowid(&db).unwrap());
    assert!(!genres.has_auto_rowid(&db).unwrap());

    let origins: Vec<IndexOrigin> = genres
        .fetch_indices(&db)
        .unwrap()
        .iter()
        .map(|i| i.origin().clone())
        .collect();
    assert!(origins.contains(&IndexOrigin::PrimaryKey));
    assert!(origins.contains(&IndexOrigin::Unique));
}

#[test]
fn test_table_without_primary_key_reports_no_rowid() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));
    let plays = table(&db, "plays");

    assert!(plays.primary_key(&db).unwrap().is_empty());
    assert!(plays.auto_primary_key(&db).unwrap().is_none());
    assert!(!plays.has_rowid(&db).unwrap());
    assert!(!plays.has_auto_rowid(&db).unwrap());
}

#[test]
fn test_column_metadata() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));
    let albums = table(&db, "albums");

    let title = albums.get_column(&db, "TITLE").unwrap().unwrap();
    assert_eq!(title.table(), "albums");
    assert_eq!(title.ordinal(), 2);
    assert_eq!(title.declared_type(), "TEXT");
    assert!(title.is_not_null());
    assert_eq!(title.default_value(), &Value::from("'untitled'"));
    assert!(!title.is_primary_key());

    let released = albums.get_column(&db, "released").unwrap().unwrap();
    assert_eq!(released.declared_type(), "INT");
    assert!(!released.is_integer_type());
    assert_eq!(released.default_value(), &Value::Null);
}

#[test]
fn test_index_columns_resolve_in_index_order() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));
    let albums = table(&db, "albums");

    let index = albums.get_index(&db, "IDX_ALBUMS_ARTIST").unwrap().unwrap();
    assert_eq!(index.origin(), &IndexOrigin::CreateIndex);
    assert!(!index.is_unique());

    let slots = index.fetch_index_columns(&db).unwrap();
    let keys: Vec<(Option<&str>, bool)> = slots
        .iter()
        .filter(|s| s.is_key())
        .map(|s| (s.name(), s.is_descending()))
        .collect();
    assert_eq!(keys, [(Some("artist_id"), false), (Some("title"), true)]);
    assert!(slots.iter().any(|s| !s.is_key() && s.is_rowid()));

    let columns: Vec<String> = index
        .columns(&db)
        .unwrap()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(columns, ["artist_id", "title"]);
}

#[test]
fn test_schema_snapshot_agrees_with_live_calls() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));

    for t in db.tables().unwrap() {
        let schema = t.schema(&db).unwrap();
        assert_eq!(schema.has_rowid(), t.has_rowid(&db).unwrap(), "{t}");
        assert_eq!(schema.has_auto_rowid(), t.has_auto_rowid(&db).unwrap(), "{t}");
        assert_eq!(schema.columns(), t.fetch_columns(&db).unwrap(), "{t}");
        assert_eq!(schema.indices().len(), t.fetch_indices(&db).unwrap().len());
    }
}

#[test]
fn test_execute_rows_and_typed_access() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));

    let rows = db
        .execute("SELECT a.name AS artist, b.title, b.released FROM albums b JOIN artists a USING (artist_id) ORDER BY b.released")
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].index(), 0);
    assert_eq!(rows[1].index(), 1);
    assert_eq!(rows[0].get_as::<String>("Artist").unwrap(), "Slint");
    assert_eq!(rows[1].get_as::<i64>("released").unwrap(), 2001);
    assert!(rows[0].get("missing").is_err());
}

#[test]
fn test_delete_and_drop_table() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));

    table(&db, "plays").delete(&db).unwrap();
    assert!(!db.table_exists("plays").unwrap());

    let err = db.drop_table("").unwrap_err();
    assert!(matches!(err, SqliteError::InvalidArgument { .. }));
}

#[test]
fn test_quoted_identifiers() {
    let dir = TempDir::new().unwrap();
    let db = open(&catalog_db(&dir));
    let name = "we\"ird table";
    db.execute_batch(&format!(
        "CREATE TABLE {} (\"sel\"\"ect\" INTEGER PRIMARY KEY, x)",
        escape_name(name)
    ))
    .unwrap();

    let weird = table(&db, name);
    let columns = weird.fetch_columns(&db).unwrap();
    assert_eq!(columns[0].name(), "sel\"ect");
    assert!(columns[0].is_rowid());
    assert_eq!(columns[1].declared_type(), "");
}

#[test]
fn test_read_only_config() {
    let dir = TempDir::new().unwrap();
    let path = catalog_db(&dir);

    let config_path = dir.path().join("db.yml");
    let config = DatabaseConfig {
        read_only: true,
        ..DatabaseConfig::for_path(&path)
    };
    config.save(&config_path).unwrap();

    let db = Database::from_config(&DatabaseConfig::load(&config_path).unwrap()).unwrap();
    assert_eq!(db.path(), Some(path.as_path()));
    assert_eq!(db.tables().unwrap().len(), 5);
    assert!(db.execute_batch("DELETE FROM plays").is_err());
}

#[test]
fn test_read_only_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        read_only: true,
        ..DatabaseConfig::for_path(dir.path().join("absent.db"))
    };
    let err = Database::from_config(&config).unwrap_err();
    assert!(matches!(err, SqliteError::DatabaseError(_)));
}
