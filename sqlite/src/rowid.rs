//! Rowid resolution.
//!
//! SQLite gives every ordinary table a 64-bit rowid. A column declared
//! `INTEGER PRIMARY KEY` becomes an alias for it; any other primary key is
//! backed by an automatic index (origin `pk`) whose last slot is the
//! rowid. `WITHOUT ROWID` tables have no such slot.
//!
//! These functions work on metadata that has already been fetched, so the
//! live [`Table`](crate::Table) and the [`TableSchema`](crate::TableSchema)
//! snapshot apply identical rules. `auto_pk` is the column list of the
//! table's automatic primary-key index, or `None` when it has none.

use tablescope_core::eq_ignore_case;
use tracing::debug;

use crate::column::Column;
use crate::index::IndexColumn;

/// Returns `true` if `column` qualifies as the table's rowid alias.
///
/// The column must be part of the primary key with a declared type of
/// exactly `INTEGER`. If an automatic primary-key index exists, the engine
/// must also report the column's slot in it as the rowid.
pub fn can_be_rowid(column: &Column, auto_pk: Option<&[IndexColumn]>) -> bool {
    if !column.is_primary_key() || !column.is_integer_type() {
        return false;
    }
    match auto_pk {
        None => true,
        Some(index_columns) => index_columns
            .iter()
            .find(|ic| ic.name().is_some_and(|n| eq_ignore_case(n, column.name())))
            .is_some_and(IndexColumn::is_rowid),
    }
}

/// Marks the rowid column, if exactly one column qualifies.
///
/// Returns the position of the marked column. Composite integer keys
/// produce several candidates and therefore mark nothing.
pub(crate) fn resolve_rowid(columns: &mut [Column], auto_pk: Option<&[IndexColumn]>) -> Option<usize> {
    let mut eligible = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| can_be_rowid(c, auto_pk))
        .map(|(i, _)| i);

    match (eligible.next(), eligible.next()) {
        (Some(i), None) => {
            columns[i].mark_rowid();
            debug!(table = columns[i].table(), column = columns[i].name(), "Resolved rowid alias");
            Some(i)
        }
        _ => None,
    }
}

/// Returns `true` if the table has a rowid, declared or implicit.
pub fn has_rowid(columns: &[Column], auto_pk: Option<&[IndexColumn]>) -> bool {
    columns.iter().any(Column::is_rowid) || auto_pk_has_rowid(auto_pk)
}

/// Returns `true` if the table's rowid exists only implicitly, with no
/// column aliasing it.
pub fn has_auto_rowid(columns: &[Column], auto_pk: Option<&[IndexColumn]>) -> bool {
    !columns.iter().any(Column::is_rowid) && auto_pk_has_rowid(auto_pk)
}

fn auto_pk_has_rowid(auto_pk: Option<&[IndexColumn]>) -> bool {
    auto_pk.is_some_and(|ics| ics.iter().any(IndexColumn::is_rowid))
}
