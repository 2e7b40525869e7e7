pub use crate::config::*;
use crate::table::{Column, RowId, Table};

/// A builder for assembling a table column by column.
///
/// This is the simplest way to hand survey answers to this crate when they do not
/// come from a file.
///
/// ```
/// use survey_cleaning::builder::Builder;
/// # use survey_cleaning::CleaningError;
///
/// let table = Builder::new()
///     .text_column("id", &["r1", "r2"])
///     .likert_column("Q1", &[Some(1), Some(4)])
///     .likert_column("Q2", &[Some(2), None])
///     .build()?;
///
/// assert_eq!(table.num_rows(), 2);
/// assert_eq!(table.column_names(), vec!["id", "Q1", "Q2"]);
/// # Ok::<(), CleaningError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _index: Option<Vec<RowId>>,
    pub(crate) _columns: Vec<Column>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Sets an explicit row index. By default, rows are numbered from 0.
    pub fn index(self, index: &[RowId]) -> Builder {
        Builder {
            _index: Some(index.to_vec()),
            _columns: self._columns,
        }
    }

    /// Adds a column of integer answers. `None` is a missing answer.
    pub fn likert_column(self, name: &str, answers: &[Option<i64>]) -> Builder {
        let values: Vec<Option<f64>> = answers.iter().map(|a| a.map(|x| x as f64)).collect();
        self.numeric_column(name, &values)
    }

    pub fn numeric_column(mut self, name: &str, values: &[Option<f64>]) -> Builder {
        self._columns.push(Column::numeric(name, values.to_vec()));
        self
    }

    pub fn text_column(mut self, name: &str, values: &[&str]) -> Builder {
        let values: Vec<Option<String>> = values
            .iter()
            .map(|s| if s.is_empty() { None } else { Some(s.to_string()) })
            .collect();
        self._columns.push(Column::text(name, values));
        self
    }

    /// Checks the columns and assembles the table.
    ///
    /// Fails if the columns do not have the same number of values, or if two columns share a name.
    pub fn build(self) -> CleaningResult<Table> {
        match self._index {
            Some(index) => Table::new(index, self._columns),
            None => Table::from_columns(self._columns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_index() {
        let t = Builder::new()
            .index(&[10, 20])
            .likert_column("Q1", &[Some(1), Some(2)])
            .build()
            .unwrap();
        assert_eq!(t.index(), &[10, 20]);
        assert_eq!(t.numeric("Q1").unwrap(), &[Some(1.0), Some(2.0)]);
    }

    #[test]
    fn index_length_is_checked() {
        let res = Builder::new()
            .index(&[0])
            .likert_column("Q1", &[Some(1), Some(2)])
            .build();
        assert!(matches!(res, Err(CleaningError::ColumnLength { .. })));
    }

    #[test]
    fn empty_text_is_missing() {
        let t = Builder::new().text_column("id", &["a", ""]).build().unwrap();
        let c = t.column("id").unwrap();
        assert_eq!(
            c.values,
            crate::table::ColumnValues::Text(vec![Some("a".to_string()), None])
        );
    }
}
