use crate::clean::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputSettings {
    /// csv or excel
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "excludeColumns")]
    pub exclude_columns: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSettings {
    #[serde(rename = "scalePoints")]
    pub scale_points: Option<u32>,
    #[serde(rename = "straightLine")]
    pub straight_line: Option<bool>,
    #[serde(rename = "missingValues")]
    pub missing_values: Option<bool>,
    #[serde(rename = "outOfRange")]
    pub out_of_range: Option<bool>,
    #[serde(rename = "stepPattern")]
    pub step_pattern: Option<bool>,
    #[serde(rename = "keepRows")]
    pub keep_rows: Option<Vec<usize>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ScaleSettings {
    pub name: String,
    pub columns: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManipulationSettings {
    #[serde(rename = "reverseColumns")]
    pub reverse_columns: Option<Vec<String>>,
    #[serde(rename = "includeOriginal")]
    pub include_original: Option<bool>,
    pub scales: Option<Vec<ScaleSettings>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "cleanedPath")]
    pub cleaned_path: Option<String>,
    #[serde(rename = "removedPath")]
    pub removed_path: Option<String>,
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
    #[serde(rename = "summaryColumns")]
    pub summary_columns: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub input: InputSettings,
    pub cleaning: Option<CleaningSettings>,
    pub manipulation: Option<ManipulationSettings>,
    pub output: Option<OutputSettings>,
}

impl CleaningSettings {
    pub fn options(&self) -> CleaningOptions {
        CleaningOptions {
            straight_line: self.straight_line.unwrap_or(false),
            missing_values: self.missing_values.unwrap_or(false),
            out_of_range: self.out_of_range.unwrap_or(false),
            step_pattern: self.step_pattern.unwrap_or(false),
        }
    }
}

impl ScaleSettings {
    pub fn definition(&self) -> ScaleDefinition {
        ScaleDefinition {
            name: self.name.clone(),
            columns: self.columns.clone(),
        }
    }
}

pub fn read_config(path: &str) -> CleanResult<JobConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: JobConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config() {
        let config: JobConfig =
            serde_json::from_str(r#"{"input": {"filePath": "answers.csv"}}"#).unwrap();
        assert_eq!(config.input.file_path, "answers.csv");
        assert_eq!(config.input.provider, None);
        assert_eq!(config.cleaning, None);
        assert_eq!(
            CleaningSettings::default().options(),
            CleaningOptions::NONE
        );
    }

    #[test]
    fn full_config() {
        let path = format!("{}/tests/data/survey_job.json", env!("CARGO_MANIFEST_DIR"));
        let config = read_config(&path).unwrap();
        assert_eq!(config.input.provider, Some("csv".to_string()));
        assert_eq!(config.input.exclude_columns, Some(vec!["id".to_string()]));
        let cleaning = config.cleaning.unwrap();
        assert_eq!(cleaning.options(), CleaningOptions::ALL);
        assert_eq!(cleaning.keep_rows, Some(vec![3]));
        let scales = config.manipulation.unwrap().scales.unwrap();
        assert_eq!(
            scales[0].definition(),
            ScaleDefinition::new("anxiety", &["Q1", "Q2_r"])
        );
    }

    #[test]
    fn malformed_config() {
        let path = format!("{}/tests/data/survey.csv", env!("CARGO_MANIFEST_DIR"));
        assert!(matches!(
            read_config(&path),
            Err(CleanError::ParsingJson { .. })
        ));
        assert!(matches!(
            read_config("/does/not/exist.json"),
            Err(CleanError::OpeningJson { .. })
        ));
    }
}
