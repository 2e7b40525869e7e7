// Primitives for reading Excel files.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use survey_cleaning::Table;

use crate::clean::{
    io_common::{assemble_table, header_name, read_cell, simplify_file_name},
    *,
};

pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> CleanResult<Table> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header_row = iter.next().context(EmptyInputSnafu {
        path: simplify_file_name(path),
    })?;
    let header: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(idx, &read_excel_cell(cell).unwrap_or_default()))
        .collect();
    debug!("read_excel_table: header: {:?}", header);

    let rows: Vec<Vec<Option<String>>> = iter
        .map(|row| row.iter().map(read_excel_cell).collect())
        .collect();
    assemble_table(path, header, rows)
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> CleanResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })?;
        return Ok(wrange);
    }
    let all_worksheets = workbook.worksheets();
    match all_worksheets.as_slice() {
        [] => EmptyInputSnafu {
            path: simplify_file_name(path),
        }
        .fail(),
        [(worksheet_name, wrange), rest @ ..] => {
            if !rest.is_empty() {
                warn!(
                    "{} has {} worksheets, reading the first one: {:?}",
                    path,
                    rest.len() + 1,
                    worksheet_name
                );
            }
            Ok(wrange.clone())
        }
    }
}

/// The content of a cell, or None if it is missing.
fn read_excel_cell(cell: &DataType) -> Option<String> {
    match cell {
        DataType::Empty => None,
        DataType::String(s) => read_cell(s),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) | DataType::DateTime(f) => Some(f.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        // Formula errors (#DIV/0!, ...) are missing answers.
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(read_excel_cell(&DataType::Empty), None);
        assert_eq!(read_excel_cell(&DataType::Int(4)), Some("4".to_string()));
        assert_eq!(read_excel_cell(&DataType::Float(4.0)), Some("4".to_string()));
        assert_eq!(read_excel_cell(&DataType::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(
            read_excel_cell(&DataType::String(" NA ".to_string())),
            None
        );
        assert_eq!(
            read_excel_cell(&DataType::String("r1".to_string())),
            Some("r1".to_string())
        );
    }

    #[test]
    fn missing_file() {
        let res = read_excel_table("/does/not/exist.xlsx", None);
        assert!(matches!(res, Err(CleanError::OpeningExcel { .. })));
    }

    fn workbook() -> String {
        format!("{}/tests/data/survey.xlsx", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn named_worksheet() {
        let t = read_excel_table(&workbook(), Some("answers")).unwrap();
        assert_eq!(t.column_names(), vec!["id", "Q1", "Q2", "Q3", "Q4"]);
        assert_eq!(t.num_rows(), 7);
        assert!(!t.column("id").unwrap().is_numeric());
        assert_eq!(t.numeric("Q1").unwrap()[2], None);
        assert_eq!(t.numeric("Q1").unwrap()[3], Some(8.0));
        assert_eq!(t.numeric("Q4").unwrap()[6], Some(1.0));
    }

    #[test]
    fn first_worksheet_by_default() {
        // The workbook has two worksheets: the first one is read.
        let by_default = read_excel_table(&workbook(), None).unwrap();
        let named = read_excel_table(&workbook(), Some("answers")).unwrap();
        assert_eq!(by_default, named);
    }

    #[test]
    fn worksheet_errors() {
        assert!(matches!(
            read_excel_table(&workbook(), Some("results")),
            Err(CleanError::MissingWorksheet { .. })
        ));
        // Only one column.
        assert!(matches!(
            read_excel_table(&workbook(), Some("notes")),
            Err(CleanError::TooFewColumns { num_columns: 1, .. })
        ));
    }
}
