//! Connection configuration.
//!
//! Defines the YAML-serializable settings used to open a [`Database`].
//!
//! # Example YAML
//!
//! ```yaml
//! path: chinook.db
//! read_only: true
//! busy_timeout_ms: 5000
//! foreign_keys: true
//! ```
//!
//! Every key is optional; missing keys take the [`Default`] values.
//!
//! [`Database`]: crate::Database

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for opening a database connection.
///
/// # Examples
///
/// ```
/// use tablescope_sqlite::DatabaseConfig;
///
/// let config: DatabaseConfig = serde_yaml::from_str("path: app.db\nread_only: true\n").unwrap();
/// assert!(config.read_only);
/// assert_eq!(config.busy_timeout_ms, 5000);
/// assert!(config.foreign_keys);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file. `None` opens a private in-memory database.
    pub path: Option<PathBuf>,
    /// Open the file read-only. Ignored for in-memory databases.
    pub read_only: bool,
    /// How long to wait on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// Enforce foreign key constraints on this connection.
    pub foreign_keys: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            read_only: false,
            busy_timeout_ms: 5000,
            foreign_keys: true,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for the database file at `path`, other settings default.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SqliteError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::SqliteError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SqliteError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::SqliteError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
path: /var/data/chinook.db
read_only: true
busy_timeout_ms: 250
foreign_keys: false
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: DatabaseConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.path, Some(PathBuf::from("/var/data/chinook.db")));
        assert!(config.read_only);
        assert_eq!(config.busy_timeout_ms, 250);
        assert!(!config.foreign_keys);
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_deserialize_empty_mapping_uses_defaults() {
        let config: DatabaseConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, DatabaseConfig::default());
        assert!(config.path.is_none());
    }

    #[test]
    fn test_for_path() {
        let config = DatabaseConfig::for_path("x.db");
        assert_eq!(config.path.as_deref(), Some(Path::new("x.db")));
        assert!(!config.read_only);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.yml");

        let original: DatabaseConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = DatabaseConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatabaseConfig::load(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, crate::SqliteError::IoError(_)));
    }
}
