use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_cleaning::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::clean::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

/// Writing to this destination sends the content to the standard output.
const STDOUT: &str = "stdout";

#[derive(Debug, Snafu)]
pub enum CleanError {
    #[snafu(display("Error opening CSV file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing CSV content"))]
    WritingCsv { source: csv::Error },
    #[snafu(display("Error writing CSV content"))]
    FlushingCsv { source: std::io::Error },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("The file {path} has no data"))]
    EmptyInput { path: String },
    #[snafu(display("The file {path} has {num_columns} column(s), at least 2 are required"))]
    TooFewColumns { path: String, num_columns: usize },
    #[snafu(display("Unknown input type {provider}, expected csv or excel"))]
    UnknownProvider { provider: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the cleaned table and the reference {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("No input file: pass --input or a job description with --config"))]
    MissingInput {},
    #[snafu(display("Cannot read scale {definition:?}, expected name=column1,column2,..."))]
    InvalidScaleDefinition { definition: String },
    #[snafu(display("Cannot find the directory of the job description"))]
    MissingParentDir {},
    #[snafu(display("Cleaning failed"))]
    Library { source: CleaningError },
}

pub type CleanResult<T> = Result<T, CleanError>;

/// Everything needed to run a cleaning job, after merging the job description
/// and the command line.
#[derive(PartialEq, Debug, Clone)]
pub struct JobSettings {
    pub input_path: String,
    pub provider: String,
    pub excel_worksheet_name: Option<String>,
    pub exclude_columns: Vec<String>,
    pub scale_points: u32,
    pub options: CleaningOptions,
    pub keep_rows: Vec<RowId>,
    pub reverse_columns: Vec<String>,
    pub include_original: bool,
    pub scales: Vec<ScaleDefinition>,
    pub summary_columns: Option<Vec<String>>,
    pub cleaned_path: Option<String>,
    pub removed_path: Option<String>,
    pub summary_path: Option<String>,
    pub reference_path: Option<String>,
}

fn parse_scale(definition: &str) -> CleanResult<ScaleDefinition> {
    let (name, columns) = definition
        .split_once('=')
        .context(InvalidScaleDefinitionSnafu { definition })?;
    let columns: Vec<&str> = columns
        .split(',')
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    ensure!(
        !name.trim().is_empty() && !columns.is_empty(),
        InvalidScaleDefinitionSnafu { definition }
    );
    Ok(ScaleDefinition::new(name.trim(), &columns))
}

fn infer_provider(path: &str) -> String {
    let ext = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    match ext.as_deref() {
        Some("xlsx") | Some("xlsm") => "excel".to_string(),
        _ => "csv".to_string(),
    }
}

fn first_non_empty<T: Clone>(cli: &[T], config: Option<&Vec<T>>) -> Vec<T> {
    if cli.is_empty() {
        config.cloned().unwrap_or_default()
    } else {
        cli.to_vec()
    }
}

/// Merges the job description (if any) with the command line arguments.
///
/// The command line always wins. The paths of the job description are relative to
/// the directory of the job description.
pub fn job_settings(args: &Args) -> CleanResult<JobSettings> {
    let (config, root_p): (Option<JobConfig>, Option<PathBuf>) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (Some(config), Some(root_p))
        }
        None => (None, None),
    };
    let resolve = |p: &String| -> String {
        match &root_p {
            Some(root) if p.as_str() != STDOUT => root.join(p).display().to_string(),
            _ => p.clone(),
        }
    };

    let input = config.as_ref().map(|c| c.input.clone());
    let cleaning = config
        .as_ref()
        .and_then(|c| c.cleaning.clone())
        .unwrap_or_default();
    let manipulation = config
        .as_ref()
        .and_then(|c| c.manipulation.clone())
        .unwrap_or_default();
    let output = config
        .as_ref()
        .and_then(|c| c.output.clone())
        .unwrap_or_default();

    let input_path = match (&args.input, &input) {
        (Some(p), _) => p.clone(),
        (None, Some(i)) => resolve(&i.file_path),
        (None, None) => return MissingInputSnafu {}.fail(),
    };
    let provider = args
        .input_type
        .clone()
        .or_else(|| input.as_ref().and_then(|i| i.provider.clone()))
        .unwrap_or_else(|| infer_provider(&input_path));

    let config_options = cleaning.options();
    let options = CleaningOptions {
        straight_line: args.straight_line || config_options.straight_line,
        missing_values: args.missing || config_options.missing_values,
        out_of_range: args.out_of_range || config_options.out_of_range,
        step_pattern: args.step_pattern || config_options.step_pattern,
    };

    let scales: Vec<ScaleDefinition> = if args.scale.is_empty() {
        manipulation
            .scales
            .unwrap_or_default()
            .iter()
            .map(|s| s.definition())
            .collect()
    } else {
        args.scale
            .iter()
            .map(|s| parse_scale(s))
            .collect::<CleanResult<Vec<ScaleDefinition>>>()?
    };

    let summary_columns = if args.summary.is_empty() {
        output.summary_columns.clone()
    } else {
        Some(args.summary.clone())
    };

    let cleaned_path = args
        .out
        .clone()
        .or_else(|| output.cleaned_path.as_ref().map(resolve))
        .or_else(|| Some(STDOUT.to_string()));

    let res = JobSettings {
        input_path,
        provider,
        excel_worksheet_name: args.excel_worksheet_name.clone().or_else(|| {
            input
                .as_ref()
                .and_then(|i| i.excel_worksheet_name.clone())
        }),
        exclude_columns: first_non_empty(
            &args.exclude,
            input.as_ref().and_then(|i| i.exclude_columns.as_ref()),
        ),
        scale_points: args.scale_points.or(cleaning.scale_points).unwrap_or(7),
        options,
        keep_rows: first_non_empty(&args.keep, cleaning.keep_rows.as_ref()),
        reverse_columns: first_non_empty(&args.reverse, manipulation.reverse_columns.as_ref()),
        include_original: !args.drop_original && manipulation.include_original.unwrap_or(true),
        scales,
        summary_columns,
        cleaned_path,
        removed_path: args
            .removed_out
            .clone()
            .or_else(|| output.removed_path.as_ref().map(resolve)),
        summary_path: args
            .summary_out
            .clone()
            .or_else(|| output.summary_path.as_ref().map(resolve)),
        reference_path: args.reference.clone(),
    };
    debug!("job_settings: {:?}", res);
    Ok(res)
}

fn read_table(settings: &JobSettings) -> CleanResult<Table> {
    info!(
        "Attempting to read {:?} file {:?}",
        settings.provider, settings.input_path
    );
    match settings.provider.as_str() {
        "csv" => io_csv::read_csv_table(&settings.input_path),
        "excel" => io_excel::read_excel_table(
            &settings.input_path,
            settings.excel_worksheet_name.as_deref(),
        ),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

fn rule_key(rule: InvalidityRule) -> &'static str {
    match rule {
        InvalidityRule::StraightLine => "straightLine",
        InvalidityRule::MissingValues => "missingValues",
        InvalidityRule::OutOfRange => "outOfRange",
        InvalidityRule::StepPattern => "stepPattern",
    }
}

/// The rows flagged by each enabled rule, for the summary.
fn flagged_rows_js(
    table: &Table,
    settings: &JobSettings,
    scale: ScaleSpec,
) -> CleanResult<JSMap<String, JSValue>> {
    let mut res: JSMap<String, JSValue> = JSMap::new();
    if !settings.options.any_selected() {
        return Ok(res);
    }
    let (to_process, _) = split(table, &settings.exclude_columns).context(LibrarySnafu {})?;
    let matrix = to_process.response_matrix().context(LibrarySnafu {})?;
    for rule in settings.options.enabled_rules() {
        res.insert(
            rule_key(rule).to_string(),
            json!(detect(rule, &matrix, scale)),
        );
    }
    Ok(res)
}

fn summary_to_json(table: &Table, rows: &[SummaryRow]) -> CleanResult<Vec<JSValue>> {
    let mut l: Vec<JSValue> = Vec::new();
    for row in rows {
        let freqs: Vec<JSValue> = frequencies(table, &row.variable)
            .context(LibrarySnafu {})?
            .iter()
            .map(|(value, count)| json!({"value": value, "count": count}))
            .collect();
        l.push(json!({
            "variable": row.variable,
            "mean": row.stats.mean,
            "sd": row.stats.std,
            "min": row.stats.min,
            "max": row.stats.max,
            "meanPlusSd": row.stats.mean_plus_std,
            "meanMinusSd": row.stats.mean_minus_std,
            "ceilingEffect": row.ceiling_effect,
            "floorEffect": row.floor_effect,
            "frequencies": freqs,
        }));
    }
    Ok(l)
}

/// Reverse-scored items, then scales.
fn manipulate(table: &Table, settings: &JobSettings, scale: ScaleSpec) -> CleaningResult<Table> {
    let reversed = if settings.reverse_columns.is_empty() {
        table.clone()
    } else {
        let reversed = reverse(table, &settings.reverse_columns, scale)?;
        prepare_export(
            table,
            &reversed,
            &settings.reverse_columns,
            settings.include_original,
        )?
    };
    aggregate_scales(&reversed, &settings.scales)
}

fn write_output(path: &str, content: &str) -> CleanResult<()> {
    if path == STDOUT {
        print!("{}", content);
        Ok(())
    } else {
        info!("Writing {}", path);
        fs::write(path, content).context(WritingOutputSnafu { path })
    }
}

fn normalize_lines(s: &str) -> String {
    s.replace("\r\n", "\n").trim_end().to_string()
}

fn check_reference(reference_path: &str, computed: &str) -> CleanResult<()> {
    let reference = fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
        path: reference_path,
    })?;
    let reference = normalize_lines(&reference);
    let computed = normalize_lines(computed);
    if reference != computed {
        warn!("Found differences with the reference table");
        print_diff(reference.as_str(), computed.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The cleaned table matches the reference {}", reference_path);
    Ok(())
}

/// Runs a cleaning job: reads the input, cleans it, applies the manipulations and
/// writes all the requested outputs.
///
/// Returns the exported table.
pub fn run_job(settings: &JobSettings) -> CleanResult<Table> {
    info!("settings: {:?}", settings);
    let table = read_table(settings)?;
    let scale = ScaleSpec::new(settings.scale_points).context(LibrarySnafu {})?;

    let outcome = run_cleaning(
        &table,
        &settings.exclude_columns,
        scale,
        &settings.options,
        &settings.keep_rows,
    )
    .context(LibrarySnafu {})?;

    let order = table.column_names();
    let (final_table, removal, removed, status) = match outcome {
        CleaningOutcome::NothingSelected => {
            warn!("No cleaning option selected: the data is exported without cleaning");
            if !settings.keep_rows.is_empty() {
                warn!("Ignoring the rows to keep: {:?}", settings.keep_rows);
            }
            (table.clone(), RemovalSet::new(), None, "nothingSelected")
        }
        CleaningOutcome::AllRemoved(report) => {
            warn!("All the rows have been removed: the cleaned table only has the rows to keep");
            (
                report.final_table,
                report.removal,
                Some(report.removed),
                "allRemoved",
            )
        }
        CleaningOutcome::Cleaned(report) => (
            report.final_table,
            report.removal,
            Some(report.removed),
            "cleaned",
        ),
    };

    let exported = manipulate(&final_table, settings, scale).context(LibrarySnafu {})?;

    let summary_columns = settings
        .summary_columns
        .clone()
        .unwrap_or_else(|| exported.numeric_column_names());
    let rows = summary(&exported, &summary_columns).context(LibrarySnafu {})?;
    for row in rows.iter() {
        info!("{}", row);
    }

    let cleaned_csv = io_csv::write_csv(&exported, false)?;
    if let Some(p) = &settings.cleaned_path {
        write_output(p, &cleaned_csv)?;
    }

    match (&settings.removed_path, &removed) {
        (Some(p), Some(r)) => {
            let r2 = reorder_columns(r, &order).context(LibrarySnafu {})?;
            write_output(p, &io_csv::write_csv(&r2, true)?)?;
        }
        (Some(p), None) => {
            warn!("No row was checked, not writing {}", p);
        }
        _ => {}
    }

    if let Some(p) = &settings.summary_path {
        let summary_js = json!({
            "input": {
                "path": settings.input_path,
                "rows": table.num_rows(),
                "columns": table.num_columns(),
            },
            "cleaning": {
                "status": status,
                "scalePoints": scale.scale_points(),
                "flagged": flagged_rows_js(&table, settings, scale)?,
                "removedRows": removal.to_vec(),
                "restoredRows": settings.keep_rows,
            },
            "rows": exported.num_rows(),
            "statistics": summary_to_json(&exported, &rows)?,
        });
        let pretty_js = serde_json::to_string_pretty(&summary_js).context(WritingJsonSnafu {})?;
        write_output(p, &pretty_js)?;
    }

    // The reference table, if provided for comparison
    if let Some(reference_path) = &settings.reference_path {
        check_reference(reference_path, &cleaned_csv)?;
    }

    Ok(exported)
}

/// Entry point of the program.
pub fn run(args: &Args) -> CleanResult<()> {
    let settings = job_settings(args)?;
    run_job(&settings)?;
    Ok(())
}
