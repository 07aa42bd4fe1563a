//! Options for materializing typed objects from query results.

use std::fmt;

use tablescope_core::Row;

/// Per-call hooks for [`Database::load`](crate::Database::load).
///
/// The factory builds a blank instance for each accepted row; the loader
/// then fills it through the type's mapping table. The factory receives the
/// row (and therefore its ordinal via [`Row::index`]) so instances can carry
/// positional or parent information the mapping table cannot supply.
///
/// # Examples
///
/// ```
/// use tablescope_core::{Field, Mapped};
/// use tablescope_sqlite::{Database, LoadOptions};
///
/// struct Named {
///     position: usize,
///     name: String,
/// }
///
/// impl Mapped for Named {
///     const FIELDS: &'static [Field<Self>] = &[Field::new("name", |n, v| {
///         n.name = v.decode()?;
///         Ok(())
///     })];
/// }
///
/// let db = Database::open_in_memory().unwrap();
/// db.execute_batch("CREATE TABLE t (a INTEGER, b TEXT, c BLOB)").unwrap();
///
/// let options = LoadOptions::new(|row| Named {
///     position: row.index(),
///     name: String::new(),
/// })
/// .with_filter(|row| row.try_get("name").and_then(|v| v.as_str()) != Some("a"))
/// .with_max_rows(1);
/// let columns = db.load("PRAGMA table_info(\"t\")", &options).unwrap();
///
/// assert_eq!(columns.len(), 1);
/// assert_eq!(columns[0].name, "b");
/// assert_eq!(columns[0].position, 1);
/// ```
pub struct LoadOptions<'a, T> {
    factory: Box<dyn Fn(&Row) -> T + 'a>,
    filter: Option<Box<dyn Fn(&Row) -> bool + 'a>>,
    max_rows: Option<usize>,
}

impl<'a, T> LoadOptions<'a, T> {
    /// Creates options with the given instance factory.
    pub fn new(factory: impl Fn(&Row) -> T + 'a) -> Self {
        Self {
            factory: Box::new(factory),
            filter: None,
            max_rows: None,
        }
    }

    /// Runs `filter` before construction; rows it rejects are skipped.
    pub fn with_filter(mut self, filter: impl Fn(&Row) -> bool + 'a) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Stops after `max` instances have been produced.
    pub fn with_max_rows(mut self, max: usize) -> Self {
        self.max_rows = Some(max);
        self
    }

    pub fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }

    pub(crate) fn accepts(&self, row: &Row) -> bool {
        self.filter.as_ref().is_none_or(|f| f(row))
    }

    pub(crate) fn create(&self, row: &Row) -> T {
        (self.factory)(row)
    }
}

impl<'a, T: Default + 'a> Default for LoadOptions<'a, T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> fmt::Debug for LoadOptions<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("filter", &self.filter.is_some())
            .field("max_rows", &self.max_rows)
            .finish_non_exhaustive()
    }
}
