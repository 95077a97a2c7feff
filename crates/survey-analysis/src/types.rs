use crate::analysis::AnalysisOutcome;
use crate::outliers::OutlierScan;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Null count of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullCount {
    pub column: String,
    pub nulls: usize,
}

/// Overview of the raw table before any cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub shape: (usize, usize),
    pub numeric: Vec<NumericSummary>,
    pub null_counts: Vec<NullCount>,
}

impl DatasetSummary {
    /// Total number of null cells in the table.
    pub fn total_nulls(&self) -> usize {
        self.null_counts.iter().map(|n| n.nulls).sum()
    }
}

/// What the cleaning stage changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Missing `Physical_Activity` values replaced by the default.
    pub physical_activity_defaulted: usize,
    /// Missing `Mental_Health_Condition` values replaced by the default.
    pub mental_health_defaulted: usize,
    /// `Work_Location` labels renamed to the canonical synonym.
    pub work_location_renamed: usize,
    /// Rows whose `Physical_Activity` is the default after cleaning.
    pub inactive_count: usize,
    /// Rows whose `Mental_Health_Condition` is the default after cleaning.
    pub no_issues_count: usize,
}

/// Result of the age/experience consistency filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub min_working_age: i64,
    pub rows_before: usize,
    pub rows_after: usize,
    pub removed_count: usize,
}

/// Result of deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupReport {
    pub key_columns: Vec<String>,
    pub rows_before: usize,
    pub rows_after: usize,
    pub removed_count: usize,
}

/// Tukey fences of one numeric column and the rows outside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub column: String,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub outlier_count: usize,
}

impl OutlierReport {
    /// Whether `value` falls outside the fences.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower_bound || value > self.upper_bound
    }
}

/// Everything produced by one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub summary: DatasetSummary,
    pub cleaning: CleaningReport,
    pub consistency: ConsistencyReport,
    /// Rows removed by the consistency filter.
    pub inconsistent_rows: DataFrame,
    /// Shape of the table after the consistency filter.
    pub filtered_shape: (usize, usize),
    /// Where the filtered table was written, if it was.
    pub output_path: Option<PathBuf>,
    pub dedup: DedupReport,
    pub outliers: Vec<OutlierScan>,
    pub analyses: Vec<AnalysisOutcome>,
    /// The deduplicated table the analyses ran on.
    pub data: DataFrame,
    pub duration_ms: u64,
}
