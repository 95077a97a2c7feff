//! JSON report generation.

use crate::analysis::AnalysisOutcome;
use crate::error::{Result, ResultExt};
use crate::types::{
    CleaningReport, ConsistencyReport, DatasetSummary, DedupReport, OutlierReport, PipelineResult,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Machine-readable account of one run.
///
/// Used for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub input_file: String,
    /// Path of the filtered table, if it was written
    pub output_file: Option<String>,
    pub duration_ms: u64,

    /// Raw table statistics, before any cleaning
    pub summary: DatasetSummary,
    pub cleaning: CleaningReport,
    pub consistency: ConsistencyReport,
    /// Shape after the consistency filter
    pub filtered_shape: (usize, usize),
    pub dedup: DedupReport,
    /// Shape of the table the analyses ran on
    pub final_shape: (usize, usize),
    pub outliers: Vec<OutlierReport>,
    pub analyses: Vec<AnalysisOutcome>,
}

impl AnalysisReport {
    pub fn from_result(input_file: &Path, result: &PipelineResult) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.display().to_string(),
            output_file: result
                .output_path
                .as_ref()
                .map(|path| path.display().to_string()),
            duration_ms: result.duration_ms,
            summary: result.summary.clone(),
            cleaning: result.cleaning.clone(),
            consistency: result.consistency.clone(),
            filtered_shape: result.filtered_shape,
            dedup: result.dedup.clone(),
            final_shape: result.data.shape(),
            outliers: result.outliers.iter().map(|scan| scan.report.clone()).collect(),
            analyses: result.analyses.clone(),
        }
    }
}

/// Writes reports to a directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write the report as `<report_base_name>_report.json` in the output directory.
    pub fn write_report_to_file(
        &self,
        report: &AnalysisReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).context(format!(
            "Creating report directory {}",
            self.output_dir.display()
        ))?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)
            .context(format!("Creating {}", report_path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
