//! Explicit column mapping tables.
//!
//! Types that are built from catalog rows declare a static table of
//! `(column name, setter)` pairs instead of relying on runtime reflection.
//! [`populate`] walks that table against a [`Row`], so the binding between
//! result columns and struct fields is visible in one place per type.
//!
//! # Example
//!
//! ```
//! use tablescope_core::{Field, Mapped, Row, Value, populate};
//!
//! #[derive(Default)]
//! struct Entry {
//!     ordinal: i64,
//!     name: String,
//! }
//!
//! impl Mapped for Entry {
//!     const FIELDS: &'static [Field<Self>] = &[
//!         Field::new("seq", |e, v| {
//!             e.ordinal = v.decode()?;
//!             Ok(())
//!         }),
//!         Field::new("name", |e, v| {
//!             e.name = v.decode()?;
//!             Ok(())
//!         }),
//!     ];
//! }
//!
//! let row = Row::from_pairs(0, [("SEQ", Value::Integer(2)), ("name", Value::from("idx"))]);
//! let mut entry = Entry::default();
//! populate(&mut entry, &row).unwrap();
//! assert_eq!(entry.ordinal, 2);
//! assert_eq!(entry.name, "idx");
//! ```

use crate::error::{CoreError, Result};
use crate::row::Row;
use crate::value::Value;

/// Setter invoked with the matched column's value.
pub type Setter<T> = fn(&mut T, &Value) -> Result<()>;

/// One entry of a mapping table: a result column and the field it sets.
pub struct Field<T> {
    /// Result column name; matched case-insensitively.
    pub column: &'static str,
    /// Writes the decoded value into the target.
    pub apply: Setter<T>,
}

impl<T> Field<T> {
    pub const fn new(column: &'static str, apply: Setter<T>) -> Self {
        Self { column, apply }
    }
}

/// A type populated from result rows through a static mapping table.
pub trait Mapped: Sized + 'static {
    /// Column bindings, in no particular order.
    const FIELDS: &'static [Field<Self>];
}

/// Applies every field of `T::FIELDS` whose column is present in `row`.
///
/// Columns the row does not carry are skipped, so a mapping table can cover
/// several engine versions of the same pragma.
///
/// # Errors
///
/// Returns [`CoreError::Field`] naming the column whose value could not be
/// decoded.
pub fn populate<T: Mapped>(target: &mut T, row: &Row) -> Result<()> {
    for field in T::FIELDS {
        if let Some(value) = row.try_get(field.column) {
            (field.apply)(target, value).map_err(|e| CoreError::field(field.column, e))?;
        }
    }
    Ok(())
}
