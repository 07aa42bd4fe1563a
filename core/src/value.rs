//! Dynamically typed cell values.
//!
//! SQLite stores every value in one of five storage classes. [`Value`]
//! mirrors them one-to-one so rows can be carried around without a live
//! statement, and [`FromValue`] converts them into Rust types on demand.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{CoreError, Result};

/// A single cell value, tagged with its SQLite storage class.
///
/// Equality is structural, so `Value::Null == Value::Null` holds. Row
/// lookups such as [`Row::contains`](crate::Row::contains) rely on that.
///
/// # Examples
///
/// ```
/// use tablescope_core::Value;
///
/// let v = Value::Integer(42);
/// assert_eq!(v.type_name(), "INTEGER");
/// assert_eq!(v.decode::<i64>().unwrap(), 42);
/// assert_eq!(v.to_string(), "42");
///
/// assert_eq!(Value::Null.decode::<Option<String>>().unwrap(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL `NULL` (the default).
    #[default]
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit IEEE float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl Value {
    /// Returns the SQLite storage class name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "TEXT",
            Value::Blob(_) => "BLOB",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for integer and real values.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    /// Returns the text payload, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Decodes this value into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TypeMismatch`] if the storage class cannot be
    /// represented as `T`.
    pub fn decode<T: FromValue>(&self) -> Result<T> {
        T::from_value(self)
    }

    fn mismatch(&self, expected: &'static str) -> CoreError {
        CoreError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(bytes) => {
                f.write_str("x'")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                f.write_str("'")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(r) => serializer.serialize_f64(*r),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Blob(_) => serializer.collect_str(self),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Conversion from a [`Value`] into a Rust type.
///
/// Implemented for the handful of types catalog rows actually carry.
/// `Option<T>` maps `NULL` to `None` and defers everything else to `T`.
pub trait FromValue: Sized {
    /// Converts `value`, failing with [`CoreError::TypeMismatch`] when the
    /// storage class does not fit.
    fn from_value(value: &Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(*i),
            other => Err(other.mismatch("i64")),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => i32::try_from(*i).map_err(|_| value.mismatch("i32")),
            other => Err(other.mismatch("i32")),
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => u32::try_from(*i).map_err(|_| value.mismatch("u32")),
            other => Err(other.mismatch("u32")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(*i as f64),
            Value::Real(r) => Ok(*r),
            other => Err(other.mismatch("f64")),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(*i != 0),
            other => Err(other.mismatch("bool")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Err(other.mismatch("String")),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Blob(b) => Ok(b.clone()),
            Value::Text(s) => Ok(s.as_bytes().to_vec()),
            other => Err(other.mismatch("Vec<u8>")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
