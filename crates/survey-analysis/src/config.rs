//! Configuration types for the survey analysis pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use crate::schema::{AGE, SURVEY_COLUMNS, YEARS_OF_EXPERIENCE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the survey file.
pub const DEFAULT_INPUT_PATH: &str = "Impact_of_Remote_Work_on_Mental_Health.csv";

/// Configuration for the analysis pipeline.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use survey_analysis::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .input_path("survey.csv")
///     .significance_level(0.01)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Path of the survey CSV file.
    /// Default: "Impact_of_Remote_Work_on_Mental_Health.csv"
    pub input_path: PathBuf,

    /// Where the filtered table is written.
    /// If None, uses "<input_stem>_clean.csv" next to the input.
    /// Default: None
    pub output_path: Option<PathBuf>,

    /// Whether to write the filtered table to disk.
    /// Default: true
    pub save_to_disk: bool,

    /// Minimum working age used by the age/experience consistency rule.
    /// Default: 15
    pub min_working_age: i64,

    /// Significance level for classifying test results.
    /// Default: 0.05
    pub significance_level: f64,

    /// Multiplier of the IQR for the outlier fences.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Apply the Yates continuity correction to chi-squared tests with one
    /// degree of freedom.
    /// Default: true
    pub yates_correction: bool,

    /// Columns whose combined values identify a duplicate row.
    /// Default: all twenty survey columns
    pub dedup_columns: Vec<String>,

    /// Numeric columns screened for outliers.
    /// Default: Age, Years_of_Experience
    pub outlier_columns: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: None,
            save_to_disk: true,
            min_working_age: 15,
            significance_level: 0.05,
            iqr_multiplier: 1.5,
            yates_correction: true,
            dedup_columns: default_dedup_columns(),
            outlier_columns: default_outlier_columns(),
        }
    }
}

fn default_dedup_columns() -> Vec<String> {
    SURVEY_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn default_outlier_columns() -> Vec<String> {
    vec![AGE.to_string(), YEARS_OF_EXPERIENCE.to_string()]
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// The path the filtered table is written to.
    ///
    /// Falls back to `<input_stem>_clean.csv` in the input's directory.
    pub fn resolved_output_path(&self) -> PathBuf {
        if let Some(ref path) = self.output_path {
            return path.clone();
        }

        let stem = self
            .input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("survey");
        let file_name = format!("{}_clean.csv", stem);

        match self.input_path.parent() {
            Some(dir) if dir != Path::new("") => dir.join(file_name),
            _ => PathBuf::from(file_name),
        }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ConfigValidationError::InvalidSignificanceLevel(
                self.significance_level,
            ));
        }

        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier >= 0.0) {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if self.min_working_age < 0 {
            return Err(ConfigValidationError::InvalidMinWorkingAge(
                self.min_working_age,
            ));
        }

        if self.dedup_columns.is_empty() {
            return Err(ConfigValidationError::EmptyDedupColumns);
        }

        if self.save_to_disk && same_file(&self.input_path, &self.resolved_output_path()) {
            return Err(ConfigValidationError::OutputOverwritesInput(
                self.input_path.display().to_string(),
            ));
        }

        Ok(())
    }
}

/// Whether two paths name the same file.
///
/// Existing files are compared by canonical path, so `./a.csv`, `a.csv` and
/// an absolute spelling all match. An output that does not exist yet is
/// resolved through its parent directory.
fn same_file(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    match (fs::canonicalize(input), canonical_target(output)) {
        (Ok(input), Some(output)) => input == output,
        _ => false,
    }
}

fn canonical_target(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Some(resolved);
    }
    let file_name = path.file_name()?;
    let parent = match path.parent() {
        Some(dir) if dir != Path::new("") => dir,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|dir| dir.join(file_name))
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid significance level: {0} (must be strictly between 0.0 and 1.0)")]
    InvalidSignificanceLevel(f64),

    #[error("Invalid IQR multiplier: {0} (must be a non-negative number)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid minimum working age: {0} (must be non-negative)")]
    InvalidMinWorkingAge(i64),

    #[error("At least one deduplication column is required")]
    EmptyDedupColumns,

    #[error("Output path '{0}' is the input file; choose a different output path")]
    OutputOverwritesInput(String),
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    save_to_disk: Option<bool>,
    min_working_age: Option<i64>,
    significance_level: Option<f64>,
    iqr_multiplier: Option<f64>,
    yates_correction: Option<bool>,
    dedup_columns: Option<Vec<String>>,
    outlier_columns: Option<Vec<String>>,
}

impl AnalysisConfigBuilder {
    /// Set the survey CSV path.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the path the filtered table is written to.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Enable or disable writing the filtered table.
    ///
    /// When false, the pipeline keeps results in memory only.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Set the minimum working age for the consistency rule.
    pub fn min_working_age(mut self, age: i64) -> Self {
        self.min_working_age = Some(age);
        self
    }

    /// Set the significance level (alpha).
    ///
    /// # Arguments
    /// * `alpha` - Value strictly between 0.0 and 1.0 (e.g., 0.05)
    pub fn significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = Some(alpha);
        self
    }

    /// Set the IQR multiplier of the outlier fences.
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Enable or disable the Yates continuity correction.
    pub fn yates_correction(mut self, enable: bool) -> Self {
        self.yates_correction = Some(enable);
        self
    }

    /// Set the deduplication key columns.
    pub fn dedup_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dedup_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the numeric columns screened for outliers.
    pub fn outlier_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outlier_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let config = AnalysisConfig {
            input_path: self
                .input_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH)),
            output_path: self.output_path,
            save_to_disk: self.save_to_disk.unwrap_or(true),
            min_working_age: self.min_working_age.unwrap_or(15),
            significance_level: self.significance_level.unwrap_or(0.05),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(1.5),
            yates_correction: self.yates_correction.unwrap_or(true),
            dedup_columns: self.dedup_columns.unwrap_or_else(default_dedup_columns),
            outlier_columns: self.outlier_columns.unwrap_or_else(default_outlier_columns),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.min_working_age, 15);
        assert_eq!(config.significance_level, 0.05);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.dedup_columns.len(), 20);
        assert_eq!(config.outlier_columns, vec![AGE, YEARS_OF_EXPERIENCE]);
        assert!(config.yates_correction);
    }

    #[test]
    fn test_resolved_output_path_default() {
        let config = AnalysisConfig::builder()
            .input_path("data/survey.csv")
            .build()
            .unwrap();
        assert_eq!(
            config.resolved_output_path(),
            PathBuf::from("data/survey_clean.csv")
        );
    }

    #[test]
    fn test_resolved_output_path_bare_file_name() {
        let config = AnalysisConfig::default();
        assert_eq!(
            config.resolved_output_path(),
            PathBuf::from("Impact_of_Remote_Work_on_Mental_Health_clean.csv")
        );
    }

    #[test]
    fn test_validation_rejects_overwriting_input() {
        let result = AnalysisConfig::builder()
            .input_path("survey.csv")
            .output_path("survey.csv")
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::OutputOverwritesInput(_)
        ));
    }

    #[test]
    fn test_validation_rejects_aliased_input_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("survey.csv");
        fs::write(&input, "Age\n30\n").unwrap();

        // Same file through a parent hop
        let nested = dir.path().join("sub");
        fs::create_dir(&nested).unwrap();
        let result = AnalysisConfig::builder()
            .input_path(&input)
            .output_path(nested.join("..").join("survey.csv"))
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::OutputOverwritesInput(_)
        ));
    }

    #[test]
    fn test_same_file_resolves_relative_spellings() {
        // Unit tests run from the package root
        assert!(same_file(Path::new("./Cargo.toml"), Path::new("Cargo.toml")));
        let absolute = fs::canonicalize("Cargo.toml").unwrap();
        assert!(same_file(Path::new("Cargo.toml"), &absolute));
        assert!(!same_file(Path::new("Cargo.toml"), Path::new("./Cargo_clean.toml")));
    }

    #[test]
    fn test_validation_allows_sibling_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("survey.csv");
        fs::write(&input, "Age\n30\n").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let result = AnalysisConfig::builder()
            .input_path(&input)
            .output_path(dir.path().join("sub").join("..").join("survey_clean.csv"))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_same_path_allowed_without_saving() {
        let result = AnalysisConfig::builder()
            .input_path("survey.csv")
            .output_path("survey.csv")
            .save_to_disk(false)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_validation_invalid_alpha() {
        for alpha in [0.0, 1.0, -0.1, f64::NAN] {
            let result = AnalysisConfig::builder().significance_level(alpha).build();
            assert!(matches!(
                result.unwrap_err(),
                ConfigValidationError::InvalidSignificanceLevel(_)
            ));
        }
    }

    #[test]
    fn test_validation_invalid_iqr_multiplier() {
        let result = AnalysisConfig::builder().iqr_multiplier(-1.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidIqrMultiplier(_)
        ));
    }

    #[test]
    fn test_validation_empty_dedup_columns() {
        let result = AnalysisConfig::builder()
            .dedup_columns(Vec::<String>::new())
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyDedupColumns
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "input_path": "survey.csv",
            "output_path": "out/clean.csv",
            "save_to_disk": false,
            "min_working_age": 16,
            "significance_level": 0.01,
            "iqr_multiplier": 3.0,
            "yates_correction": false,
            "dedup_columns": ["Employee_ID"],
            "outlier_columns": ["Age"]
        }"#;

        let config: AnalysisConfig = serde_json::from_str(json).expect("valid config JSON");
        assert_eq!(config.min_working_age, 16);
        assert_eq!(config.significance_level, 0.01);
        assert_eq!(config.output_path, Some(PathBuf::from("out/clean.csv")));
        assert!(!config.yates_correction);
        assert!(config.validate().is_ok());
    }
}
