//! Derived columns: reverse-scored items and scale scores.
//!
//! None of the functions modify their input: they all return a new table with
//! the derived columns appended.

use log::{debug, info};
use snafu::ensure;

use crate::config::*;
use crate::table::{Column, Table};

/// Adds a reversed copy `{name}_r` of each of the given columns.
///
/// On a 5-point scale, 1 becomes 5, 2 becomes 4 and so on. Missing answers stay
/// missing. The original columns are kept.
///
/// ```
/// use survey_cleaning::builder::Builder;
/// use survey_cleaning::{reverse, ScaleSpec};
/// # use survey_cleaning::CleaningError;
///
/// let table = Builder::new()
///     .likert_column("Q1", &[Some(1), Some(2), Some(5)])
///     .build()?;
/// let reversed = reverse(&table, &["Q1".to_string()], ScaleSpec::new(5)?)?;
/// assert_eq!(reversed.numeric("Q1_r")?, &[Some(5.0), Some(4.0), Some(1.0)]);
/// # Ok::<(), CleaningError>(())
/// ```
pub fn reverse(table: &Table, columns: &[String], scale: ScaleSpec) -> CleaningResult<Table> {
    let mappings: Vec<ReverseMapping> = columns
        .iter()
        .map(|c| ReverseMapping {
            column: c.clone(),
            scale,
        })
        .collect();
    reverse_mappings(table, &mappings)
}

/// Same as [reverse], with a scale for each column.
pub fn reverse_mappings(table: &Table, mappings: &[ReverseMapping]) -> CleaningResult<Table> {
    let mut res = table.clone();
    for m in mappings {
        let offset = m.scale.max_value() + 1.0;
        let values: Vec<Option<f64>> = table
            .numeric(&m.column)?
            .iter()
            .map(|v| v.map(|x| offset - x))
            .collect();
        debug!(
            "reverse_mappings: {} -> {} (scale {})",
            m.column,
            m.reversed_name(),
            m.scale.scale_points()
        );
        res = res.with_column(Column::numeric(&m.reversed_name(), values))?;
    }
    if !mappings.is_empty() {
        info!("Reversed {} columns", mappings.len());
    }
    Ok(res)
}

/// Adds the columns `{name}_total` and `{name}_mean` for a scale.
///
/// The total is the sum of the answers of each row, the mean is that total divided
/// by the number of answers. Missing answers are skipped: a row without any answer
/// has a total of 0 and no mean.
pub fn aggregate_scale(table: &Table, definition: &ScaleDefinition) -> CleaningResult<Table> {
    ensure!(
        !definition.columns.is_empty(),
        EmptyScaleSnafu {
            name: definition.name.clone()
        }
    );
    let mut items: Vec<&[Option<f64>]> = Vec::new();
    for c in definition.columns.iter() {
        items.push(table.numeric(c)?);
    }

    let mut totals: Vec<Option<f64>> = Vec::new();
    let mut means: Vec<Option<f64>> = Vec::new();
    for pos in 0..table.num_rows() {
        let answers: Vec<f64> = items.iter().filter_map(|item| item[pos]).collect();
        let total: f64 = answers.iter().sum();
        totals.push(Some(total));
        means.push(if answers.is_empty() {
            None
        } else {
            Some(total / answers.len() as f64)
        });
    }
    info!(
        "Scale {:?}: computed {} and {} over {:?}",
        definition.name,
        definition.total_column(),
        definition.mean_column(),
        definition.columns
    );
    table
        .with_column(Column::numeric(&definition.total_column(), totals))?
        .with_column(Column::numeric(&definition.mean_column(), means))
}

/// Applies several scale definitions one after the other.
pub fn aggregate_scales(table: &Table, definitions: &[ScaleDefinition]) -> CleaningResult<Table> {
    let mut res = table.clone();
    for d in definitions {
        res = aggregate_scale(&res, d)?;
    }
    Ok(res)
}

/// Prepares the reverse-scored table for export.
///
/// With `include_original`, the reversed table is returned unchanged. Otherwise
/// the original items listed in `reverse_columns` are dropped and only their
/// `_r` versions (taken from `reversed`) remain.
///
/// Both tables must describe the same rows in the same order.
pub fn prepare_export(
    table: &Table,
    reversed: &Table,
    reverse_columns: &[String],
    include_original: bool,
) -> CleaningResult<Table> {
    ensure!(table.index() == reversed.index(), RowIndexMismatchSnafu {});
    if include_original {
        return Ok(reversed.clone());
    }
    let mut res = table.drop_columns(reverse_columns)?;
    for c in reverse_columns {
        let r = reversed.column(&reversed_column_name(c))?;
        res = res.with_column(r.clone())?;
    }
    Ok(res)
}
