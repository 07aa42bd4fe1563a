//! Error types for row access and value decoding.

use thiserror::Error;

/// Errors raised by [`Row`](crate::Row) lookups, value decoding, and
/// mapping-table population.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// No column with the given name exists in the row.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// A value's storage class cannot be decoded into the requested type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Rust-side type that was requested.
        expected: &'static str,
        /// SQLite storage class of the value.
        found: &'static str,
    },

    /// Decoding failed for a specific column.
    #[error("column '{column}': {source}")]
    Field {
        /// Column whose value could not be decoded.
        column: String,
        /// Underlying decode failure.
        #[source]
        source: Box<CoreError>,
    },
}

impl CoreError {
    pub(crate) fn field(column: &str, source: CoreError) -> Self {
        Self::Field {
            column: column.to_string(),
            source: Box::new(source),
        }
    }
}

/// Convenience alias for results with [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
