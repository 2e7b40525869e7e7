//! Splitting a table into the columns to check and the columns to leave alone,
//! and putting the pieces back together after cleaning.

use std::collections::HashSet;

use log::{debug, info};
use snafu::ensure;

use crate::config::*;
use crate::table::{RowId, Table};

/// Separates the columns that should not be processed (identifiers, categories, ...).
///
/// Returns `(to_process, excluded)`. The excluded table holds exactly the named
/// columns, the other table holds all the remaining columns in their original
/// order. Both keep the row index of the input.
pub fn split(table: &Table, exclude_columns: &[String]) -> CleaningResult<(Table, Table)> {
    let to_process = table.drop_columns(exclude_columns)?;
    let excluded = table.select(exclude_columns)?;
    info!("Excluded columns: {:?}", exclude_columns);
    info!(
        "Data to process shape: ({}, {})",
        to_process.num_rows(),
        to_process.num_columns()
    );
    info!(
        "Excluded data shape: ({}, {})",
        excluded.num_rows(),
        excluded.num_columns()
    );
    Ok((to_process, excluded))
}

/// Puts side by side two tables describing the same rows.
pub fn hconcat(left: &Table, right: &Table) -> CleaningResult<Table> {
    ensure!(left.index() == right.index(), RowIndexMismatchSnafu {});
    let mut res = left.clone();
    for c in right.columns() {
        ensure!(
            !res.has_column(&c.name),
            DuplicateColumnSnafu {
                name: c.name.clone()
            }
        );
        res = res.with_column(c.clone())?;
    }
    Ok(res)
}

/// Separates the flagged rows from the others.
///
/// Returns `(cleaned, removed)`. Both tables keep the original row index and order.
pub fn remove_rows(table: &Table, removal: &RemovalSet) -> (Table, Table) {
    let cleaned = table.filter_rows(|rid| !removal.contains(rid));
    let removed = table.filter_rows(|rid| removal.contains(rid));
    debug!(
        "remove_rows: {} rows kept, {} rows removed",
        cleaned.num_rows(),
        removed.num_rows()
    );
    (cleaned, removed)
}

/// Builds the final table: the cleaned rows followed by the removed rows that the
/// user decided to keep after all.
///
/// When no row is kept, the cleaned table is returned as is.
pub fn recombine(
    cleaned: &Table,
    removed: &Table,
    keep_indices: &[RowId],
) -> CleaningResult<Table> {
    if keep_indices.is_empty() {
        return Ok(cleaned.clone());
    }
    let cleaned_rows: HashSet<RowId> = cleaned.index().iter().cloned().collect();
    if let Some(row) = removed.index().iter().find(|rid| cleaned_rows.contains(rid)) {
        return OverlappingRowsSnafu { row: *row }.fail();
    }
    let removed_rows: HashSet<RowId> = removed.index().iter().cloned().collect();
    for row in keep_indices {
        ensure!(removed_rows.contains(row), RowNotFoundSnafu { row: *row });
    }

    let keep: HashSet<RowId> = keep_indices.iter().cloned().collect();
    let restored = removed.filter_rows(|rid| keep.contains(&rid));
    info!(
        "Final dataset keeps {} previously removed rows: {:?}",
        restored.num_rows(),
        restored.index()
    );
    cleaned.vconcat(&restored)
}

/// Puts the columns back in the order of `order`.
///
/// This only happens when the table has exactly the same columns as `order`;
/// otherwise (derived columns were added for example) the table is returned unchanged.
pub fn reorder_columns(table: &Table, order: &[String]) -> CleaningResult<Table> {
    let current: HashSet<String> = table.column_names().into_iter().collect();
    let wanted: HashSet<String> = order.iter().cloned().collect();
    if current != wanted || order.len() != table.num_columns() {
        debug!(
            "reorder_columns: column sets differ, keeping {:?}",
            table.column_names()
        );
        return Ok(table.clone());
    }
    table.select(order)
}
