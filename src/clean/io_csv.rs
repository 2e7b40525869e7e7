// Primitives for reading and writing CSV files.

use survey_cleaning::Table;

use crate::clean::{
    io_common::{assemble_table, format_cell, header_name, read_cell},
    *,
};

pub fn read_csv_table(path: &str) -> CleanResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1_usize })?
        .iter()
        .enumerate()
        .map(|(idx, s)| header_name(idx, s))
        .collect();
    debug!("read_csv_table: header: {:?}", header);

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        rows.push(line.iter().map(read_cell).collect());
    }
    assemble_table(path, header, rows)
}

/// Writes a table in CSV format.
///
/// With `with_row_index`, a first column `row` holds the original position of each row.
pub fn write_csv(table: &Table, with_row_index: bool) -> CleanResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buf);
        let mut header: Vec<String> = Vec::new();
        if with_row_index {
            header.push("row".to_string());
        }
        header.extend(table.column_names());
        wtr.write_record(&header).context(WritingCsvSnafu {})?;

        for (pos, rid) in table.index().iter().enumerate() {
            let mut record: Vec<String> = Vec::new();
            if with_row_index {
                record.push(rid.to_string());
            }
            for c in table.columns() {
                record.push(format_cell(&c.values, pos));
            }
            wtr.write_record(&record).context(WritingCsvSnafu {})?;
        }
        wtr.flush().context(FlushingCsvSnafu {})?;
    }
    Ok(String::from_utf8_lossy(&buf).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_cleaning::builder::Builder;

    #[test]
    fn read_survey() {
        let path = format!("{}/tests/data/survey.csv", env!("CARGO_MANIFEST_DIR"));
        let t = read_csv_table(&path).unwrap();
        assert_eq!(t.column_names(), vec!["id", "Q1", "Q2", "Q3", "Q4"]);
        assert_eq!(t.index(), &[0, 1, 2, 3, 4, 5, 6]);
        assert!(!t.column("id").unwrap().is_numeric());
        assert_eq!(t.numeric("Q1").unwrap()[2], None);
        assert_eq!(t.numeric("Q1").unwrap()[3], Some(8.0));
    }

    #[test]
    fn missing_file() {
        let res = read_csv_table("/does/not/exist.csv");
        assert!(matches!(res, Err(CleanError::OpeningCsv { .. })));
    }

    #[test]
    fn write_table() {
        let t = Builder::new()
            .index(&[4, 1])
            .text_column("id", &["a", "b, c"])
            .likert_column("Q1", &[Some(3), None])
            .numeric_column("Q1_mean", &[Some(4.5), Some(2.0)])
            .build()
            .unwrap();
        assert_eq!(
            write_csv(&t, false).unwrap(),
            "id,Q1,Q1_mean\na,3,4.5\n\"b, c\",,2\n"
        );
        assert_eq!(
            write_csv(&t, true).unwrap(),
            "row,id,Q1,Q1_mean\n4,a,3,4.5\n1,\"b, c\",,2\n"
        );
    }
}
