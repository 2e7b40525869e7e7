//! Descriptive statistics used to look at the distribution of each item.

use std::fmt::Display;

use log::debug;

use crate::config::*;
use crate::table::Table;

/// Basic statistics of a column, computed over the answers that are present.
///
/// The standard deviation is the sample one. Empty columns produce NaN values.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ColumnStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub mean_plus_std: f64,
    pub mean_minus_std: f64,
}

impl ColumnStats {
    pub fn from_values(values: &[Option<f64>]) -> ColumnStats {
        let answers: Vec<f64> = values.iter().filter_map(|x| *x).collect();
        let n = answers.len() as f64;
        let mean = if answers.is_empty() {
            f64::NAN
        } else {
            answers.iter().sum::<f64>() / n
        };
        let std = if answers.len() < 2 {
            f64::NAN
        } else {
            let ss: f64 = answers.iter().map(|x| (x - mean) * (x - mean)).sum();
            (ss / (n - 1.0)).sqrt()
        };
        let min = answers.iter().cloned().fold(f64::NAN, f64::min);
        let max = answers.iter().cloned().fold(f64::NAN, f64::max);
        ColumnStats {
            mean,
            std,
            min,
            max,
            mean_plus_std: mean + std,
            mean_minus_std: mean - std,
        }
    }
}

/// Statistics of one column of a table.
pub fn column_stats(table: &Table, column: &str) -> CleaningResult<ColumnStats> {
    let stats = ColumnStats::from_values(table.numeric(column)?);
    debug!("column_stats: {}: {:?}", column, stats);
    Ok(stats)
}

/// The answers pile up against the top of the scale: `mean + std > max`.
pub fn ceiling_effect(stats: &ColumnStats) -> bool {
    stats.mean_plus_std > stats.max
}

/// The answers pile up against the bottom of the scale: `mean - std < min`.
pub fn floor_effect(stats: &ColumnStats) -> bool {
    stats.mean_minus_std < stats.min
}

/// One line of the summary table.
#[derive(PartialEq, Debug, Clone)]
pub struct SummaryRow {
    pub variable: String,
    pub stats: ColumnStats,
    pub ceiling_effect: bool,
    pub floor_effect: bool,
}

impl Display for SummaryRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let yes_no = |b: bool| if b { "Yes" } else { "No" };
        write!(
            f,
            concat!(
                "{}: mean {:.2}, SD {:.2}, min {:.2}, max {:.2}, ",
                "mean+SD {:.2}, mean-SD {:.2}, ceiling effect: {}, floor effect: {}"
            ),
            self.variable,
            self.stats.mean,
            self.stats.std,
            self.stats.min,
            self.stats.max,
            self.stats.mean_plus_std,
            self.stats.mean_minus_std,
            yes_no(self.ceiling_effect),
            yes_no(self.floor_effect)
        )
    }
}

/// Statistics and ceiling/floor flags for each column, in the given order.
pub fn summary(table: &Table, columns: &[String]) -> CleaningResult<Vec<SummaryRow>> {
    let mut res: Vec<SummaryRow> = Vec::new();
    for c in columns {
        let stats = column_stats(table, c)?;
        res.push(SummaryRow {
            variable: c.clone(),
            stats,
            ceiling_effect: ceiling_effect(&stats),
            floor_effect: floor_effect(&stats),
        });
    }
    Ok(res)
}

/// The number of occurences of each value of a column, by increasing value.
///
/// This is the content of a histogram of the answers. Missing answers are not counted.
pub fn frequencies(table: &Table, column: &str) -> CleaningResult<Vec<(f64, usize)>> {
    let mut answers: Vec<f64> = table
        .numeric(column)?
        .iter()
        .filter_map(|x| *x)
        .filter(|x| !x.is_nan())
        .collect();
    answers.sort_by(|a, b| a.total_cmp(b));
    let mut res: Vec<(f64, usize)> = Vec::new();
    for x in answers {
        if let Some((value, count)) = res.last_mut() {
            if *value == x {
                *count += 1;
                continue;
            }
        }
        res.push((x, 1));
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn stats(mean: f64, std: f64, min: f64, max: f64) -> ColumnStats {
        ColumnStats {
            mean,
            std,
            min,
            max,
            mean_plus_std: mean + std,
            mean_minus_std: mean - std,
        }
    }

    #[test]
    fn basic_statistics() {
        let t = Builder::new()
            .likert_column("Q1", &[Some(1), Some(2), Some(3), Some(4), None])
            .build()
            .unwrap();
        let s = column_stats(&t, "Q1").unwrap();
        assert!(close(s.mean, 2.5));
        // Sample standard deviation of 1, 2, 3, 4.
        assert!(close(s.std, (5.0f64 / 3.0).sqrt()));
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!(close(s.mean_plus_std, 2.5 + (5.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn empty_columns_do_not_fail() {
        let t = Builder::new()
            .likert_column("Q1", &[None, None])
            .likert_column("Q2", &[Some(3), None])
            .build()
            .unwrap();
        let s = column_stats(&t, "Q1").unwrap();
        assert!(s.mean.is_nan() && s.std.is_nan() && s.min.is_nan() && s.max.is_nan());
        assert!(!ceiling_effect(&s));
        assert!(!floor_effect(&s));

        let single = column_stats(&t, "Q2").unwrap();
        assert_eq!(single.mean, 3.0);
        assert!(single.std.is_nan());
    }

    #[test]
    fn ceiling_and_floor() {
        let high = stats(4.5, 0.8, 1.0, 5.0);
        assert!(ceiling_effect(&high));
        assert!(!floor_effect(&high));

        let low = stats(1.5, 0.8, 1.0, 5.0);
        assert!(floor_effect(&low));
        assert!(!ceiling_effect(&low));

        // Strict comparisons.
        let exact = stats(3.0, 2.0, 1.0, 5.0);
        assert!(!ceiling_effect(&exact));
        assert!(!floor_effect(&exact));
    }

    #[test]
    fn summary_in_column_order() {
        let t = Builder::new()
            .likert_column("Q1", &[Some(5), Some(5), Some(4), Some(5)])
            .likert_column("Q2", &[Some(1), Some(2), Some(3), Some(4)])
            .text_column("id", &["a", "b", "c", "d"])
            .build()
            .unwrap();
        let rows = summary(&t, &["Q2".to_string(), "Q1".to_string()]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].variable, "Q2");
        assert!(!rows[0].ceiling_effect);
        assert_eq!(rows[1].variable, "Q1");
        assert!(rows[1].ceiling_effect);
        assert_eq!(
            rows[1].to_string(),
            concat!(
                "Q1: mean 4.75, SD 0.50, min 4.00, max 5.00, ",
                "mean+SD 5.25, mean-SD 4.25, ceiling effect: Yes, floor effect: No"
            )
        );

        assert!(matches!(
            summary(&t, &["id".to_string()]),
            Err(CleaningError::NotNumeric { .. })
        ));
    }

    #[test]
    fn value_frequencies() {
        let t = Builder::new()
            .likert_column("Q1", &[Some(3), Some(1), None, Some(3), Some(7)])
            .build()
            .unwrap();
        assert_eq!(
            frequencies(&t, "Q1").unwrap(),
            vec![(1.0, 1), (3.0, 2), (7.0, 1)]
        );
    }
}
