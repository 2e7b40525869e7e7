// ********* Input data structures ***********

use std::collections::BTreeSet;
use std::fmt::Display;

use snafu::{ensure, Snafu};

use crate::table::{RowId, Table};

/// The number of points of a Likert scale.
///
/// Answers are expected to lie between `1` and `scale_points` (inclusive).
/// The bound is used by the out-of-range check, the step pattern check (for the
/// wrap-around at both ends of the scale) and by reverse-scoring.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct ScaleSpec {
    scale_points: u32,
}

impl ScaleSpec {
    /// The most common scale in the surveys processed by this crate.
    pub const SEVEN_POINTS: ScaleSpec = ScaleSpec { scale_points: 7 };

    /// A scale with less than 2 points cannot distinguish any answer and is rejected.
    pub fn new(scale_points: u32) -> CleaningResult<ScaleSpec> {
        ensure!(scale_points >= 2, InvalidScaleSnafu { scale_points });
        Ok(ScaleSpec { scale_points })
    }

    pub fn scale_points(&self) -> u32 {
        self.scale_points
    }

    pub(crate) fn max_value(&self) -> f64 {
        f64::from(self.scale_points)
    }
}

/// The rules used to flag a response as invalid.
///
/// All the rules are independent. When several rules are enabled, the rows
/// flagged by any of them are removed.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct CleaningOptions {
    /// All the answers of the respondent are the same.
    pub straight_line: bool,
    /// At least one answer is missing.
    pub missing_values: bool,
    /// At least one answer is below 1 or above the number of points of the scale.
    pub out_of_range: bool,
    /// The answers follow a staircase (1, 2, 3, ...) with possible wrap-arounds.
    pub step_pattern: bool,
}

impl CleaningOptions {
    pub const NONE: CleaningOptions = CleaningOptions {
        straight_line: false,
        missing_values: false,
        out_of_range: false,
        step_pattern: false,
    };

    pub const ALL: CleaningOptions = CleaningOptions {
        straight_line: true,
        missing_values: true,
        out_of_range: true,
        step_pattern: true,
    };

    pub fn any_selected(&self) -> bool {
        !self.enabled_rules().is_empty()
    }

    /// The enabled rules, in the order they are applied.
    pub fn enabled_rules(&self) -> Vec<InvalidityRule> {
        let flags = [
            (self.straight_line, InvalidityRule::StraightLine),
            (self.missing_values, InvalidityRule::MissingValues),
            (self.out_of_range, InvalidityRule::OutOfRange),
            (self.step_pattern, InvalidityRule::StepPattern),
        ];
        flags
            .iter()
            .filter_map(|(enabled, rule)| if *enabled { Some(*rule) } else { None })
            .collect()
    }
}

/// One of the checks that can mark a response as invalid.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum InvalidityRule {
    StraightLine,
    MissingValues,
    OutOfRange,
    StepPattern,
}

impl Display for InvalidityRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InvalidityRule::StraightLine => "straight-line",
            InvalidityRule::MissingValues => "missing values",
            InvalidityRule::OutOfRange => "out-of-range",
            InvalidityRule::StepPattern => "step pattern",
        };
        write!(f, "{}", s)
    }
}

/// A factor (scale) made of several items.
///
/// Applying it to a table creates the columns `{name}_total` and `{name}_mean`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScaleDefinition {
    pub name: String,
    pub columns: Vec<String>,
}

impl ScaleDefinition {
    pub fn new(name: &str, columns: &[&str]) -> ScaleDefinition {
        ScaleDefinition {
            name: name.to_string(),
            columns: columns.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn total_column(&self) -> String {
        format!("{}_total", self.name)
    }

    pub fn mean_column(&self) -> String {
        format!("{}_mean", self.name)
    }
}

/// A column to reverse-score. The reversed values go to `{column}_r`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReverseMapping {
    pub column: String,
    pub scale: ScaleSpec,
}

impl ReverseMapping {
    pub fn reversed_name(&self) -> String {
        reversed_column_name(&self.column)
    }
}

pub fn reversed_column_name(column: &str) -> String {
    format!("{}_r", column)
}

// ******** Output data structures *********

/// The rows flagged for removal, identified by their original row index.
///
/// Every row appears at most once, in increasing order.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RemovalSet(BTreeSet<RowId>);

impl RemovalSet {
    pub fn new() -> RemovalSet {
        RemovalSet(BTreeSet::new())
    }

    pub fn contains(&self, row: RowId) -> bool {
        self.0.contains(&row)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowId> + '_ {
        self.0.iter().cloned()
    }

    pub fn to_vec(&self) -> Vec<RowId> {
        self.iter().collect()
    }

    pub(crate) fn extend(&mut self, rows: &[RowId]) {
        self.0.extend(rows.iter().cloned());
    }
}

impl FromIterator<RowId> for RemovalSet {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        RemovalSet(iter.into_iter().collect())
    }
}

/// The tables produced by a successful cleaning run.
#[derive(PartialEq, Debug, Clone)]
pub struct CleaningReport {
    /// The rows flagged by the enabled rules.
    pub removal: RemovalSet,
    /// All the rows that were not flagged, with all the columns.
    pub cleaned: Table,
    /// All the flagged rows, with all the columns.
    pub removed: Table,
    /// The cleaned rows followed by the restored rows, in the column order of the input.
    pub final_table: Table,
}

/// The outcome of a cleaning run.
#[derive(PartialEq, Debug, Clone)]
pub enum CleaningOutcome {
    /// No rule was enabled: nothing was checked.
    NothingSelected,
    /// Every single row was flagged. The cleaned table is empty and the final
    /// table only holds the restored rows.
    AllRemoved(CleaningReport),
    Cleaned(CleaningReport),
}

// ********* Errors **********

/// Errors raised on malformed arguments.
///
/// Detection never fails: missing or out-of-range values are data to detect.
#[derive(Debug, Snafu, PartialEq, Eq, Clone)]
#[snafu(visibility(pub(crate)))]
pub enum CleaningError {
    #[snafu(display("column {name:?} not found in the table"))]
    ColumnNotFound { name: String },
    #[snafu(display("column {name:?} is not numeric"))]
    NotNumeric { name: String },
    #[snafu(display("column {name:?} appears more than once"))]
    DuplicateColumn { name: String },
    #[snafu(display("column {name:?} has {actual} values, expected {expected}"))]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[snafu(display("a Likert scale needs at least 2 points, got {scale_points}"))]
    InvalidScale { scale_points: u32 },
    #[snafu(display("scale {name:?} does not contain any column"))]
    EmptyScale { name: String },
    #[snafu(display("the two tables do not have the same row index"))]
    RowIndexMismatch {},
    #[snafu(display("the two tables do not have the same columns: {left:?} vs {right:?}"))]
    SchemaMismatch {
        left: Vec<String>,
        right: Vec<String>,
    },
    #[snafu(display("row {row} is present in both tables"))]
    OverlappingRows { row: RowId },
    #[snafu(display("row {row} is not one of the removed rows"))]
    RowNotFound { row: RowId },
}

pub type CleaningResult<T> = Result<T, CleaningError>;
