//! Read-only result rows.
//!
//! A [`Row`] is built once per result row from the statement's column names
//! and the row's values. It never changes afterwards: there is no insert,
//! remove or update API, only lookups and ordered iteration.

use std::iter::Zip;
use std::slice;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{CoreError, Result};
use crate::value::{FromValue, Value};

/// Compares two column names the way SQLite compares identifiers.
///
/// ASCII names take the fast path; anything else is compared after
/// Unicode lowercasing.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// One result row: an ordered, case-insensitive name/value container.
///
/// Names are shared across every row of a result set, so cloning a
/// statement's column list per row costs one reference count.
///
/// If `names` and `values` differ in length, only the pairs present in both
/// are visible: [`len`](Row::len) is the shorter length and lookups never
/// reach past it.
///
/// # Examples
///
/// ```
/// use tablescope_core::{Row, Value};
///
/// let row = Row::new(
///     0,
///     vec!["Id".to_string(), "Name".to_string()],
///     vec![Value::Integer(1), Value::from("alice")],
/// );
///
/// assert_eq!(row.len(), 2);
/// assert_eq!(row.try_get("id"), Some(&Value::Integer(1)));
/// assert!(row.get("missing").is_err());
/// assert!(row.contains("NAME", &Value::from("alice")));
///
/// let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
/// assert_eq!(names, ["Id", "Name"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    index: usize,
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row at position `index` within its result set.
    pub fn new(index: usize, names: impl Into<Arc<[String]>>, values: Vec<Value>) -> Self {
        Self {
            index,
            names: names.into(),
            values,
        }
    }

    /// Builds a row from `(name, value)` pairs.
    pub fn from_pairs<N, V>(index: usize, pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        let (names, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(n, v)| (n.into(), v.into()))
            .unzip();
        Self::new(index, names, values)
    }

    /// Zero-based position of this row within its result set.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of name/value pairs.
    pub fn len(&self) -> usize {
        self.names.len().min(self.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names, in statement order.
    pub fn names(&self) -> &[String] {
        &self.names[..self.len()]
    }

    /// Values, in statement order.
    pub fn values(&self) -> &[Value] {
        &self.values[..self.len()]
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.names().iter().position(|n| eq_ignore_case(n, key))
    }

    /// Returns the value of the first column whose name matches `key`
    /// case-insensitively, or `None`.
    pub fn try_get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|i| &self.values[i])
    }

    /// Like [`try_get`](Row::try_get), but a miss is an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::KeyNotFound`] if no column matches.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.try_get(key)
            .ok_or_else(|| CoreError::KeyNotFound(key.to_string()))
    }

    /// Looks up `key` and decodes its value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::KeyNotFound`] on a miss, or
    /// [`CoreError::Field`] wrapping the decode failure.
    pub fn get_as<T: FromValue>(&self, key: &str) -> Result<T> {
        self.get(key)?
            .decode()
            .map_err(|e| CoreError::field(key, e))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Returns `true` if some column named `key` holds `value`.
    ///
    /// Every matching name is checked, not just the first, and two nulls
    /// compare equal.
    pub fn contains(&self, key: &str, value: &Value) -> bool {
        self.iter()
            .any(|(n, v)| eq_ignore_case(n, key) && v == value)
    }

    /// Iterates `(name, value)` pairs in stored order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.names().iter().zip(self.values().iter()),
        }
    }
}

/// Iterator over the pairs of a [`Row`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: Zip<slice::Iter<'a, String>, slice::Iter<'a, Value>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(n, v)| (n.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
