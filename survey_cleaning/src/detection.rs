//! Detection of invalid responses.
//!
//! Each detector looks at the answers of every respondent and returns the
//! indices of the rows it flags, in increasing order. The detectors never fail:
//! missing or out-of-range answers are exactly what they are looking for.

use log::{debug, info};

use crate::config::*;
use crate::table::{ResponseMatrix, RowId};

/// Runs the enabled rules and collects all the flagged rows.
///
/// A row flagged by several rules is only reported once.
///
/// ```
/// use survey_cleaning::{find_invalid_rows, CleaningOptions, ResponseMatrix, ScaleSpec};
///
/// let matrix = ResponseMatrix::from_rows(vec![
///     vec![Some(1.0), Some(1.0), Some(1.0)],
///     vec![Some(1.0), Some(2.0), Some(4.0)],
///     vec![None, None, Some(3.0)],
///     vec![Some(8.0), Some(4.0), Some(4.0)],
/// ]);
/// let options = CleaningOptions {
///     straight_line: true,
///     missing_values: true,
///     out_of_range: true,
///     step_pattern: false,
/// };
/// let removal = find_invalid_rows(&matrix, ScaleSpec::SEVEN_POINTS, &options);
/// assert_eq!(removal.to_vec(), vec![0, 2, 3]);
/// ```
pub fn find_invalid_rows(
    matrix: &ResponseMatrix,
    scale: ScaleSpec,
    options: &CleaningOptions,
) -> RemovalSet {
    let mut removal = RemovalSet::new();
    for rule in options.enabled_rules() {
        let rows = detect(rule, matrix, scale);
        if !rows.is_empty() {
            info!("Rows with {} responses: {:?}", rule, rows);
        }
        removal.extend(&rows);
    }
    info!("Total {} invalid responses detected", removal.len());
    removal
}

/// Runs a single rule.
pub fn detect(rule: InvalidityRule, matrix: &ResponseMatrix, scale: ScaleSpec) -> Vec<RowId> {
    match rule {
        InvalidityRule::StraightLine => straight_line(matrix),
        InvalidityRule::MissingValues => missing(matrix),
        InvalidityRule::OutOfRange => out_of_range(matrix, scale),
        InvalidityRule::StepPattern => step_pattern(matrix, scale),
    }
}

/// Rows in which the standard deviation of the answers is zero.
///
/// Missing answers are ignored. The standard deviation is the sample one, which
/// is only defined with at least two answers: a row with a single answer is not
/// a straight line.
pub fn straight_line(matrix: &ResponseMatrix) -> Vec<RowId> {
    flag_rows(matrix, |row| {
        let answers = observed(row);
        // A zero standard deviation is equivalent to all the answers being equal,
        // and the equality test does not accumulate rounding errors.
        match answers.split_first() {
            Some((first, rest)) if !rest.is_empty() => rest.iter().all(|x| x == first),
            _ => false,
        }
    })
}

/// Rows with at least one missing answer.
pub fn missing(matrix: &ResponseMatrix) -> Vec<RowId> {
    flag_rows(matrix, |row| row.iter().any(|x| x.is_none()))
}

/// Rows with at least one answer above the scale or below 1.
pub fn out_of_range(matrix: &ResponseMatrix, scale: ScaleSpec) -> Vec<RowId> {
    let max_value = scale.max_value();
    flag_rows(matrix, |row| {
        let answers = observed(row);
        let over = answers.iter().cloned().fold(f64::NAN, f64::max) > max_value;
        let under = answers.iter().cloned().fold(f64::NAN, f64::min) < 1.0;
        over || under
    })
}

/// Rows following a staircase: every answer is one step above or below the previous one.
///
/// The steps wrap around the ends of the scale (after the maximum comes 1, before 1
/// comes the maximum) and the direction may change any number of times, so that
/// ascending, descending, mountain and valley shapes are all caught.
///
/// Straight lines, rows with less than two answers and rows with a missing
/// answer are never flagged.
pub fn step_pattern(matrix: &ResponseMatrix, scale: ScaleSpec) -> Vec<RowId> {
    flag_rows(matrix, |row| {
        let answers: Option<Vec<f64>> = row.iter().cloned().collect();
        match answers {
            Some(answers) if answers.len() >= 2 => {
                let is_flat = answers.iter().all(|x| *x == answers[0]);
                !is_flat
                    && answers
                        .windows(2)
                        .all(|w| is_step(w[0], w[1], scale.max_value()))
            }
            _ => false,
        }
    })
}

fn is_step(current: f64, next: f64, max_value: f64) -> bool {
    let ascending = if current == max_value {
        next == 1.0
    } else {
        current < max_value && next == current + 1.0
    };
    let descending = if current == 1.0 {
        next == max_value
    } else {
        current > 1.0 && next == current - 1.0
    };
    ascending || descending
}

fn observed(row: &[Option<f64>]) -> Vec<f64> {
    row.iter().filter_map(|x| *x).collect()
}

fn flag_rows<F>(matrix: &ResponseMatrix, is_invalid: F) -> Vec<RowId>
where
    F: Fn(&[Option<f64>]) -> bool,
{
    let mut res: Vec<RowId> = matrix
        .rows()
        .filter(|(rid, row)| {
            let flagged = is_invalid(*row);
            if flagged {
                debug!("flag_rows: row {}: {:?}", rid, row);
            }
            flagged
        })
        .map(|(rid, _)| rid)
        .collect();
    res.sort_unstable();
    res
}
