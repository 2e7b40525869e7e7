/*!
Cleaning and scoring of Likert-scale survey responses.

This crate takes the answers of a survey (one row per respondent, one column per
item), finds the responses that should not be trusted, and derives the usual
scores from the remaining ones:

* invalid responses: straight lines, missing answers, answers outside of the
  scale, and staircase ("step") patterns. See [find_invalid_rows].
* partitioning: leaving identifier columns aside while checking the answers, and
  restoring some of the removed rows afterwards. See [split] and [recombine].
* reverse-scored items (`_r` columns) and scale scores (`_total` and `_mean`
  columns). See [reverse] and [aggregate_scale].
* descriptive statistics with ceiling and floor effect checks. See [summary].

The simplest entry point is [run_cleaning], which runs the whole cleaning step:

```
use survey_cleaning::builder::Builder;
use survey_cleaning::*;

let table = Builder::new()
    .text_column("id", &["r1", "r2", "r3", "r4"])
    .likert_column("Q1", &[Some(1), Some(1), None, Some(8)])
    .likert_column("Q2", &[Some(1), Some(2), None, Some(4)])
    .likert_column("Q3", &[Some(1), Some(2), Some(3), Some(4)])
    .build()?;

let options = CleaningOptions {
    straight_line: true,
    missing_values: true,
    out_of_range: true,
    step_pattern: false,
};
let outcome = run_cleaning(&table, &["id".to_string()], ScaleSpec::SEVEN_POINTS, &options, &[3])?;

match outcome {
    CleaningOutcome::Cleaned(report) => {
        assert_eq!(report.removal.to_vec(), vec![0, 2, 3]);
        // Row 3 was restored on request.
        assert_eq!(report.final_table.index(), &[1, 3]);
    }
    _ => unreachable!(),
}
# Ok::<(), CleaningError>(())
```

All the operations are pure: they never modify the tables they are given and
always return new tables.
*/

mod config;
mod detection;
mod partition;
mod stats;
mod table;
mod transform;

pub mod builder;
pub mod manual;

use log::{info, warn};

pub use crate::config::*;
pub use crate::detection::*;
pub use crate::partition::*;
pub use crate::stats::*;
pub use crate::table::*;
pub use crate::transform::*;

/// Runs the complete cleaning step on a table.
///
/// Arguments:
/// * `table` the survey, as loaded from the file
/// * `exclude_columns` the columns that are not answers (identifiers, ...). They are
/// not checked, but they are kept in the outputs.
/// * `scale` the number of points of the Likert scale
/// * `options` the rules to apply
/// * `keep_indices` the flagged rows that should be kept after all
///
/// The final table contains the rows that passed all the checks followed by the
/// restored rows, with the columns in the same order as the input.
pub fn run_cleaning(
    table: &Table,
    exclude_columns: &[String],
    scale: ScaleSpec,
    options: &CleaningOptions,
    keep_indices: &[RowId],
) -> CleaningResult<CleaningOutcome> {
    info!(
        "Cleaning {} rows, {} columns, scale: {}, options: {:?}",
        table.num_rows(),
        table.num_columns(),
        scale.scale_points(),
        options
    );
    let (to_process, excluded) = split(table, exclude_columns)?;
    if !options.any_selected() {
        info!("No cleaning option selected");
        return Ok(CleaningOutcome::NothingSelected);
    }

    let matrix = to_process.response_matrix()?;
    let removal = find_invalid_rows(&matrix, scale, options);

    let all_columns = hconcat(&excluded, &to_process)?;
    let (cleaned, removed) = remove_rows(&all_columns, &removal);
    let all_removed = cleaned.is_empty() && !table.is_empty();

    let recombined = recombine(&cleaned, &removed, keep_indices)?;
    let final_table = reorder_columns(&recombined, &table.column_names())?;
    info!(
        "Cleaning done: {} rows kept, {} rows removed, {} rows restored",
        cleaned.num_rows(),
        removed.num_rows(),
        keep_indices.len()
    );
    let report = CleaningReport {
        removal,
        cleaned,
        removed,
        final_table,
    };
    if all_removed {
        warn!("All the rows have been removed by the cleaning options");
        Ok(CleaningOutcome::AllRemoved(report))
    } else {
        Ok(CleaningOutcome::Cleaned(report))
    }
}

#[cfg(test)]
mod tests {
    use super::builder::Builder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn basic_options() -> CleaningOptions {
        CleaningOptions {
            straight_line: true,
            missing_values: true,
            out_of_range: true,
            step_pattern: false,
        }
    }

    fn survey() -> Table {
        Builder::new()
            .likert_column("Q1", &[Some(1), Some(1), None, Some(8), Some(2)])
            .text_column("id", &["a", "b", "c", "d", "e"])
            .likert_column("Q2", &[Some(1), Some(2), None, Some(4), Some(5)])
            .likert_column("Q3", &[Some(1), Some(2), Some(3), Some(4), Some(3)])
            .build()
            .unwrap()
    }

    #[test]
    fn end_to_end() {
        init();
        let outcome = run_cleaning(
            &survey(),
            &names(&["id"]),
            ScaleSpec::SEVEN_POINTS,
            &basic_options(),
            &[],
        )
        .unwrap();
        let report = match outcome {
            CleaningOutcome::Cleaned(r) => r,
            x => panic!("unexpected outcome {:?}", x),
        };
        assert_eq!(report.removal.to_vec(), vec![0, 2, 3]);
        assert_eq!(report.cleaned.index(), &[1, 4]);
        assert_eq!(report.removed.index(), &[0, 2, 3]);
        // Excluded columns come first in the intermediate tables.
        assert_eq!(report.cleaned.column_names(), vec!["id", "Q1", "Q2", "Q3"]);
        // The final table follows the input.
        assert_eq!(report.final_table.column_names(), vec!["Q1", "id", "Q2", "Q3"]);
        assert_eq!(report.final_table.index(), &[1, 4]);
    }

    #[test]
    fn restore_rows() {
        let outcome = run_cleaning(
            &survey(),
            &names(&["id"]),
            ScaleSpec::SEVEN_POINTS,
            &basic_options(),
            &[2, 0],
        )
        .unwrap();
        if let CleaningOutcome::Cleaned(report) = outcome {
            assert_eq!(report.final_table.index(), &[1, 4, 0, 2]);
        } else {
            panic!("expected a cleaned table");
        }
    }

    #[test]
    fn nothing_selected() {
        let outcome = run_cleaning(
            &survey(),
            &names(&["id"]),
            ScaleSpec::SEVEN_POINTS,
            &CleaningOptions::NONE,
            &[],
        )
        .unwrap();
        assert_eq!(outcome, CleaningOutcome::NothingSelected);
    }

    #[test]
    fn all_removed() {
        let t = Builder::new()
            .likert_column("Q1", &[Some(1), Some(3)])
            .likert_column("Q2", &[Some(1), Some(3)])
            .build()
            .unwrap();
        let outcome = run_cleaning(
            &t,
            &[],
            ScaleSpec::SEVEN_POINTS,
            &basic_options(),
            &[],
        )
        .unwrap();
        match outcome {
            CleaningOutcome::AllRemoved(report) => {
                assert_eq!(report.removal.to_vec(), vec![0, 1]);
                assert_eq!(report.removed, t);
                assert!(report.cleaned.is_empty());
                assert!(report.final_table.is_empty());
                assert_eq!(report.final_table.column_names(), vec!["Q1", "Q2"]);
            }
            x => panic!("unexpected outcome {:?}", x),
        }
    }

    #[test]
    fn restore_rows_after_all_removed() {
        let t = Builder::new()
            .likert_column("Q1", &[Some(1), Some(3)])
            .text_column("id", &["a", "b"])
            .likert_column("Q2", &[Some(1), Some(3)])
            .build()
            .unwrap();
        let outcome = run_cleaning(
            &t,
            &names(&["id"]),
            ScaleSpec::SEVEN_POINTS,
            &basic_options(),
            &[0],
        )
        .unwrap();
        match outcome {
            CleaningOutcome::AllRemoved(report) => {
                assert_eq!(report.final_table.index(), &[0]);
                assert_eq!(report.final_table.column_names(), vec!["Q1", "id", "Q2"]);
                assert_eq!(report.final_table.numeric("Q1").unwrap(), &[Some(1.0)]);
            }
            x => panic!("unexpected outcome {:?}", x),
        }

        let res = run_cleaning(
            &t,
            &names(&["id"]),
            ScaleSpec::SEVEN_POINTS,
            &basic_options(),
            &[99],
        );
        assert_eq!(res, Err(CleaningError::RowNotFound { row: 99 }));
    }

    #[test]
    fn text_columns_must_be_excluded() {
        let res = run_cleaning(
            &survey(),
            &[],
            ScaleSpec::SEVEN_POINTS,
            &basic_options(),
            &[],
        );
        assert_eq!(
            res,
            Err(CleaningError::NotNumeric {
                name: "id".to_string()
            })
        );
    }

    #[test]
    fn unknown_excluded_column() {
        let res = run_cleaning(
            &survey(),
            &names(&["respondent"]),
            ScaleSpec::SEVEN_POINTS,
            &basic_options(),
            &[],
        );
        assert!(matches!(res, Err(CleaningError::ColumnNotFound { .. })));
    }

    #[test]
    fn invalid_scale() {
        assert_eq!(
            ScaleSpec::new(1),
            Err(CleaningError::InvalidScale { scale_points: 1 })
        );
        assert_eq!(ScaleSpec::new(5).map(|s| s.scale_points()), Ok(5));
    }
}
