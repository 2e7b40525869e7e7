use clap::Parser;

/// This is a cleaning program for Likert-scale survey responses.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A job description in JSON format. All the options below
    /// override the content of the job description.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference CSV file. If provided, surveyclean will check that the
    /// cleaned table matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the cleaned table in CSV format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) Where to write the removed rows in CSV format.
    #[clap(long, value_parser)]
    pub removed_out: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the summary in JSON format.
    #[clap(long, value_parser)]
    pub summary_out: Option<String>,

    /// (file path) The survey responses.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or excel.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (repeatable) A column that is not an answer to the survey (ID, category, ...).
    #[clap(long, value_parser)]
    pub exclude: Vec<String>,

    /// (default 7) The number of points of the Likert scale.
    #[clap(long, value_parser)]
    pub scale_points: Option<u32>,

    /// Removes the respondents who gave the same answer to all the items.
    #[clap(long, takes_value = false)]
    pub straight_line: bool,

    /// Removes the respondents with missing answers.
    #[clap(long, takes_value = false)]
    pub missing: bool,

    /// Removes the respondents with answers outside of the scale.
    #[clap(long, takes_value = false)]
    pub out_of_range: bool,

    /// Removes the respondents whose answers follow a staircase pattern.
    #[clap(long, takes_value = false)]
    pub step_pattern: bool,

    /// (repeatable) A removed row (by its original position, starting at 0) to keep anyway.
    #[clap(long, value_parser)]
    pub keep: Vec<usize>,

    /// (repeatable) A column to reverse-score. The reversed column is called `{column}_r`.
    #[clap(long, value_parser)]
    pub reverse: Vec<String>,

    /// Only keeps the reversed version of the reverse-scored columns.
    #[clap(long, takes_value = false)]
    pub drop_original: bool,

    /// (repeatable, format `name=column1,column2,...`) A scale to compute. The total and the mean
    /// of the columns are added as `{name}_total` and `{name}_mean`.
    #[clap(long, value_parser)]
    pub scale: Vec<String>,

    /// (repeatable) A column to describe in the summary. By default, all the numeric columns.
    #[clap(long, value_parser)]
    pub summary: Vec<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
