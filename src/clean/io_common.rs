// Primitives shared by the readers and writers of tables.

use std::path::Path;

use survey_cleaning::{Column, ColumnValues, Table};

use crate::clean::*;

/// The labels that mark a missing answer, on top of empty cells.
pub const MISSING_LABELS: [&str; 12] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "<NA>", "#N/A", "#NA",
];

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The content of a cell, or None if it is missing.
pub fn read_cell(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() || MISSING_LABELS.contains(&t) {
        None
    } else {
        Some(t.to_string())
    }
}

/// The name of a column. Blank header cells get a placeholder name.
pub fn header_name(idx: usize, raw: &str) -> String {
    let t = raw.trim();
    if t.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        t.to_string()
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|x| !x.is_nan())
}

/// Builds a table from the cells of a file.
///
/// A column is numeric when all its present cells are numbers (a column that is
/// entirely empty is numeric as well). The rows are indexed by their position,
/// starting at 0.
pub fn assemble_table(
    path: &str,
    header: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
) -> CleanResult<Table> {
    let file_name = simplify_file_name(path);
    ensure!(
        header.len() >= 2,
        TooFewColumnsSnafu {
            path: file_name,
            num_columns: header.len()
        }
    );
    ensure!(!rows.is_empty(), EmptyInputSnafu { path: file_name });

    let mut columns: Vec<Column> = Vec::new();
    for (idx, name) in header.iter().enumerate() {
        let cells: Vec<Option<&String>> = rows
            .iter()
            .map(|r| r.get(idx).and_then(|c| c.as_ref()))
            .collect();
        let numbers: Option<Vec<Option<f64>>> = cells
            .iter()
            .map(|c| match c {
                None => Some(None),
                Some(s) => parse_number(s).map(Some),
            })
            .collect();
        let column = match numbers {
            Some(values) => Column::numeric(name, values),
            None => Column::text(name, cells.iter().map(|c| c.cloned()).collect()),
        };
        debug!(
            "assemble_table: {}: column {:?} numeric: {}",
            file_name,
            name,
            column.is_numeric()
        );
        columns.push(column);
    }
    let table = Table::from_columns(columns).context(LibrarySnafu {})?;
    info!(
        "Read {} rows and {} columns from {}",
        table.num_rows(),
        table.num_columns(),
        file_name
    );
    Ok(table)
}

/// The text of a cell when writing a table. Missing values are empty.
pub fn format_cell(values: &ColumnValues, pos: usize) -> String {
    match values {
        ColumnValues::Numeric(v) => match v.get(pos).cloned().flatten() {
            Some(x) if !x.is_nan() => x.to_string(),
            _ => String::new(),
        },
        ColumnValues::Text(v) => v.get(pos).cloned().flatten().unwrap_or_default(),
    }
}
