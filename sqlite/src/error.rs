//! Error types for SQLite catalog operations.
//!
//! Engine failures pass through unchanged inside
//! [`SqliteError::DatabaseError`]; this crate adds no translation layer.

use tablescope_core::CoreError;
use thiserror::Error;

/// Errors that can occur while querying or introspecting a database.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Row lookup, value decoding, or mapping failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A required argument was blank or unusable.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration file I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl SqliteError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
