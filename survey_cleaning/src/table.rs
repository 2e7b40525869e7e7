//! The tabular data structures shared by all the operations.
//!
//! A [Table] is a list of named columns sharing one row index. The row index
//! stores the original position of each row in the uploaded file and is never
//! renumbered: removing, restoring or splitting rows keeps it intact so that a
//! row can always be referred to by the number the user saw first.

use std::collections::HashSet;

use log::debug;
use snafu::{ensure, OptionExt};

use crate::config::*;

/// The original position of a row.
pub type RowId = usize;

#[derive(PartialEq, Debug, Clone)]
pub enum ColumnValues {
    /// Answers to a survey item. `None` is a missing answer.
    Numeric(Vec<Option<f64>>),
    /// Identifiers, free text and other columns that are not processed.
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take(&self, positions: &[usize]) -> ColumnValues {
        match self {
            ColumnValues::Numeric(v) => {
                ColumnValues::Numeric(positions.iter().map(|p| v[*p]).collect())
            }
            ColumnValues::Text(v) => {
                ColumnValues::Text(positions.iter().map(|p| v[*p].clone()).collect())
            }
        }
    }

    /// None if the two columns do not hold the same type of values.
    fn concat(&self, other: &ColumnValues) -> Option<ColumnValues> {
        match (self, other) {
            (ColumnValues::Numeric(a), ColumnValues::Numeric(b)) => {
                Some(ColumnValues::Numeric(a.iter().chain(b.iter()).cloned().collect()))
            }
            (ColumnValues::Text(a), ColumnValues::Text(b)) => {
                Some(ColumnValues::Text(a.iter().chain(b.iter()).cloned().collect()))
            }
            _ => None,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn numeric(name: &str, values: Vec<Option<f64>>) -> Column {
        Column {
            name: name.to_string(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn text(name: &str, values: Vec<Option<String>>) -> Column {
        Column {
            name: name.to_string(),
            values: ColumnValues::Text(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }

    pub fn as_numeric(&self) -> CleaningResult<&[Option<f64>]> {
        match &self.values {
            ColumnValues::Numeric(v) => Ok(v.as_slice()),
            ColumnValues::Text(_) => NotNumericSnafu {
                name: self.name.clone(),
            }
            .fail(),
        }
    }
}

/// A table of survey responses.
///
/// Invariants: every column has exactly one value per entry of the index, and
/// column names are unique.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Table {
    index: Vec<RowId>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(index: Vec<RowId>, columns: Vec<Column>) -> CleaningResult<Table> {
        let mut seen: HashSet<&str> = HashSet::new();
        for c in columns.iter() {
            ensure!(
                seen.insert(c.name.as_str()),
                DuplicateColumnSnafu {
                    name: c.name.clone()
                }
            );
            ensure!(
                c.values.len() == index.len(),
                ColumnLengthSnafu {
                    name: c.name.clone(),
                    expected: index.len(),
                    actual: c.values.len(),
                }
            );
        }
        Ok(Table { index, columns })
    }

    /// A table with the default index `0..n`.
    pub fn from_columns(columns: Vec<Column>) -> CleaningResult<Table> {
        let num_rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        Table::new((0..num_rows).collect(), columns)
    }

    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> CleaningResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .context(ColumnNotFoundSnafu { name })
    }

    pub fn numeric(&self, name: &str) -> CleaningResult<&[Option<f64>]> {
        self.column(name)?.as_numeric()
    }

    /// The names of the numeric columns, in table order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Keeps the given columns, in the given order.
    pub fn select(&self, names: &[String]) -> CleaningResult<Table> {
        let mut columns: Vec<Column> = Vec::new();
        for name in names {
            columns.push(self.column(name)?.clone());
        }
        Table::new(self.index.clone(), columns)
    }

    /// Removes the given columns. All of them must exist.
    pub fn drop_columns(&self, names: &[String]) -> CleaningResult<Table> {
        for name in names {
            self.column(name)?;
        }
        let columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| !names.contains(&c.name))
            .cloned()
            .collect();
        Ok(Table {
            index: self.index.clone(),
            columns,
        })
    }

    /// Returns a copy of the table with an extra column.
    ///
    /// If a column with the same name already exists, it is replaced in place.
    pub fn with_column(&self, column: Column) -> CleaningResult<Table> {
        ensure!(
            column.values.len() == self.num_rows(),
            ColumnLengthSnafu {
                name: column.name.clone(),
                expected: self.num_rows(),
                actual: column.values.len(),
            }
        );
        let mut columns = self.columns.clone();
        if let Some(existing) = columns.iter_mut().find(|c| c.name == column.name) {
            debug!("with_column: replacing column {:?}", column.name);
            *existing = column;
        } else {
            columns.push(column);
        }
        Ok(Table {
            index: self.index.clone(),
            columns,
        })
    }

    /// Keeps the rows for which the predicate on the row index holds, in the current order.
    pub fn filter_rows<F>(&self, keep: F) -> Table
    where
        F: Fn(RowId) -> bool,
    {
        let positions: Vec<usize> = self
            .index
            .iter()
            .enumerate()
            .filter_map(|(pos, rid)| if keep(*rid) { Some(pos) } else { None })
            .collect();
        self.take_positions(&positions)
    }

    fn take_positions(&self, positions: &[usize]) -> Table {
        Table {
            index: positions.iter().map(|p| self.index[*p]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values.take(positions),
                })
                .collect(),
        }
    }

    /// Appends the rows of `other` below the rows of this table.
    ///
    /// Both tables must have the same columns (in the same order and with the same types).
    pub(crate) fn vconcat(&self, other: &Table) -> CleaningResult<Table> {
        let mismatch = || SchemaMismatchSnafu {
            left: self.column_names(),
            right: other.column_names(),
        };
        ensure!(self.column_names() == other.column_names(), mismatch());
        let mut columns: Vec<Column> = Vec::new();
        for (a, b) in self.columns.iter().zip(other.columns.iter()) {
            let values = a.values.concat(&b.values).context(mismatch())?;
            columns.push(Column {
                name: a.name.clone(),
                values,
            });
        }
        let mut index = self.index.clone();
        index.extend(other.index.iter().cloned());
        Ok(Table { index, columns })
    }

    /// The numeric content of the table, row by row.
    ///
    /// Fails if one of the columns is not numeric.
    pub fn response_matrix(&self) -> CleaningResult<ResponseMatrix> {
        let mut cols: Vec<&[Option<f64>]> = Vec::new();
        for c in self.columns.iter() {
            cols.push(c.as_numeric()?);
        }
        let rows: Vec<Vec<Option<f64>>> = (0..self.num_rows())
            .map(|pos| cols.iter().map(|c| c[pos]).collect())
            .collect();
        Ok(ResponseMatrix {
            index: self.index.clone(),
            rows,
        })
    }
}

/// The answers of all the respondents: one row per respondent, one value per item.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ResponseMatrix {
    index: Vec<RowId>,
    rows: Vec<Vec<Option<f64>>>,
}

impl ResponseMatrix {
    /// A matrix with the default index `0..n`.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> ResponseMatrix {
        ResponseMatrix {
            index: (0..rows.len()).collect(),
            rows,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows, along with their original row index.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &[Option<f64>])> + '_ {
        self.index
            .iter()
            .cloned()
            .zip(self.rows.iter().map(|r| r.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec![3, 5, 8],
            vec![
                Column::text(
                    "id",
                    vec![Some("a".to_string()), Some("b".to_string()), None],
                ),
                Column::numeric("Q1", vec![Some(1.0), None, Some(3.0)]),
                Column::numeric("Q2", vec![Some(4.0), Some(5.0), Some(6.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_columns_of_different_lengths() {
        let res = Table::from_columns(vec![
            Column::numeric("Q1", vec![Some(1.0), Some(2.0)]),
            Column::numeric("Q2", vec![Some(1.0)]),
        ]);
        assert_eq!(
            res,
            Err(CleaningError::ColumnLength {
                name: "Q2".to_string(),
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn rejects_duplicate_columns() {
        let res = Table::from_columns(vec![
            Column::numeric("Q1", vec![Some(1.0)]),
            Column::numeric("Q1", vec![Some(1.0)]),
        ]);
        assert!(matches!(res, Err(CleaningError::DuplicateColumn { .. })));
    }

    #[test]
    fn filter_keeps_index() {
        let t = sample().filter_rows(|rid| rid != 5);
        assert_eq!(t.index(), &[3, 8]);
        assert_eq!(t.numeric("Q1").unwrap(), &[Some(1.0), Some(3.0)]);
    }

    #[test]
    fn with_column_replaces_in_place() {
        let t = sample()
            .with_column(Column::numeric("Q1", vec![None, None, None]))
            .unwrap();
        assert_eq!(t.column_names(), vec!["id", "Q1", "Q2"]);
        assert_eq!(t.numeric("Q1").unwrap(), &[None, None, None]);
    }

    #[test]
    fn response_matrix_requires_numeric_columns() {
        let t = sample();
        assert_eq!(
            t.response_matrix(),
            Err(CleaningError::NotNumeric {
                name: "id".to_string()
            })
        );
        let m = t
            .drop_columns(&["id".to_string()])
            .unwrap()
            .response_matrix()
            .unwrap();
        let rows: Vec<(RowId, Vec<Option<f64>>)> =
            m.rows().map(|(rid, r)| (rid, r.to_vec())).collect();
        assert_eq!(
            rows,
            vec![
                (3, vec![Some(1.0), Some(4.0)]),
                (5, vec![None, Some(5.0)]),
                (8, vec![Some(3.0), Some(6.0)]),
            ]
        );
    }

    #[test]
    fn vconcat_checks_types() {
        let t = sample();
        let other = Table::new(
            vec![9],
            vec![
                Column::numeric("id", vec![Some(1.0)]),
                Column::numeric("Q1", vec![Some(1.0)]),
                Column::numeric("Q2", vec![Some(1.0)]),
            ],
        )
        .unwrap();
        assert!(matches!(
            t.vconcat(&other),
            Err(CleaningError::SchemaMismatch { .. })
        ));
    }
}
