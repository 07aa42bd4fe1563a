//! Engine-agnostic row and value types.
//!
//! This crate defines the data every other tablescope crate passes around:
//!
//! - [`Value`] — a cell value tagged with its SQLite storage class, plus
//!   [`FromValue`] for decoding into Rust types.
//! - [`Row`] — one result row: an immutable, ordered, case-insensitive
//!   name/value container.
//! - [`Mapped`] / [`Field`] / [`populate`] — explicit mapping tables that
//!   bind result columns to struct fields.
//!
//! # Example
//!
//! ```
//! use tablescope_core::{Row, Value};
//!
//! let row = Row::from_pairs(0, [("cid", Value::Integer(0)), ("name", Value::from("id"))]);
//! assert_eq!(row.get_as::<String>("NAME").unwrap(), "id");
//! assert_eq!(row.try_get("pk"), None);
//! ```

mod error;
mod mapping;
mod row;
mod value;

pub use error::{CoreError, Result};
pub use mapping::{Field, Mapped, Setter, populate};
pub use row::{Iter, Row, eq_ignore_case};
pub use value::{FromValue, Value};
