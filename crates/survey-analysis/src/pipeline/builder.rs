//! Main analysis pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! running the survey analysis from raw table to interpreted tests.

use crate::analysis::{AssociationAnalyzer, RESEARCH_QUESTIONS};
use crate::cleaner::{ConsistencyFilter, DataCleaner, Deduplicator};
use crate::config::{AnalysisConfig, ConfigValidationError};
use crate::error::{Result, ResultExt};
use crate::loader::{load_survey, write_survey};
use crate::outliers::OutlierScanner;
use crate::pipeline::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::summary::summarize;
use crate::types::PipelineResult;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The survey analysis pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use survey_analysis::{AnalysisConfig, Pipeline};
///
/// let config = AnalysisConfig::builder()
///     .input_path("survey.csv")
///     .save_to_disk(false)
///     .build()?;
///
/// let result = Pipeline::builder().config(config).build()?.run_from_path()?;
/// for analysis in &result.analyses {
///     println!("{}: {}", analysis.question_id, analysis.interpretation);
/// }
/// ```
pub struct Pipeline {
    config: AnalysisConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DataCleaner,
    consistency: ConsistencyFilter,
    deduplicator: Deduplicator,
    outlier_scanner: OutlierScanner,
    analyzer: AssociationAnalyzer,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load the configured input file and run every stage on it.
    pub fn run_from_path(&self) -> Result<PipelineResult> {
        let start_time = Instant::now();
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            0.0,
            format!("Loading {}", self.config.input_path.display()),
        ));

        let df = match load_survey(&self.config.input_path) {
            Ok(df) => df,
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                return Err(e);
            }
        };

        let mut result = self.run(df)?;
        result.duration_ms = start_time.elapsed().as_millis() as u64;
        Ok(result)
    }

    /// Run every stage on an already loaded raw table.
    pub fn run(&self, df: DataFrame) -> Result<PipelineResult> {
        match self.run_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, df: DataFrame) -> Result<PipelineResult> {
        let start_time = Instant::now();
        info!("Starting analysis pipeline on {} rows...", df.height());

        // Step 1: Describe the raw table
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Summarizing,
            0.0,
            "Summarizing raw table...",
        ));
        let summary = summarize(&df).context("Summarizing raw table")?;
        debug!(
            "Raw shape {:?}, {} null cells",
            summary.shape,
            summary.total_nulls()
        );

        // Step 2: Default missing answers
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Cleaning,
            0.0,
            "Cleaning categorical columns...",
        ));
        let (df, cleaning) = self.cleaner.clean(df)?;

        // Step 3: Age/experience consistency
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::ConsistencyCheck,
            0.0,
            "Checking age/experience consistency...",
        ));
        let outcome = self
            .consistency
            .apply(&df)
            .context("Checking age/experience consistency")?;
        info!(
            "Consistency filter removed {} of {} rows",
            outcome.report.removed_count, outcome.report.rows_before
        );
        let mut filtered = outcome.kept;
        let filtered_shape = filtered.shape();

        // Step 4: Persist the filtered table
        let output_path = if self.config.save_to_disk {
            let path = self.config.resolved_output_path();
            self.report_progress(ProgressUpdate::new(
                AnalysisStage::Saving,
                0.0,
                format!("Writing {}", path.display()),
            ));
            write_survey(&mut filtered, &path)?;
            info!("Filtered table written to {}", path.display());
            Some(path)
        } else {
            debug!("Skipping write of filtered table (save_to_disk = false)");
            None
        };

        // Step 5: Duplicates
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Deduplication,
            0.0,
            "Removing duplicate rows...",
        ));
        let (data, dedup) = self
            .deduplicator
            .deduplicate(&filtered)
            .context("Removing duplicates")?;
        info!("Deduplication removed {} rows", dedup.removed_count);

        // Step 6: Outlier screening, read-only
        let total_columns = self.config.outlier_columns.len();
        let mut outliers = Vec::with_capacity(total_columns);
        for (idx, column) in self.config.outlier_columns.iter().enumerate() {
            self.report_progress(ProgressUpdate::with_items(
                AnalysisStage::OutlierScreening,
                format!("Column: {}", column),
                idx,
                total_columns,
                format!("Screening {} for outliers", column),
            ));
            let scan = self
                .outlier_scanner
                .scan(&data, column)
                .context(format!("Screening '{}' for outliers", column))?;
            info!(
                "{}: {} outliers outside [{:.2}, {:.2}]",
                column, scan.report.outlier_count, scan.report.lower_bound, scan.report.upper_bound
            );
            outliers.push(scan);
        }

        // Step 7: Research questions
        let mut analyses = Vec::with_capacity(RESEARCH_QUESTIONS.len());
        for (idx, question) in RESEARCH_QUESTIONS.iter().enumerate() {
            self.report_progress(ProgressUpdate::with_items(
                AnalysisStage::Analysis,
                format!("Analysis {}", question.id),
                idx,
                RESEARCH_QUESTIONS.len(),
                question.description,
            ));
            analyses.push(self.analyzer.run(&data, question)?);
        }

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!("Analysis pipeline finished in {} ms", duration_ms);

        Ok(PipelineResult {
            summary,
            cleaning,
            consistency: outcome.report,
            inconsistent_rows: outcome.invalid,
            filtered_shape,
            output_path,
            dedup,
            outliers,
            analyses,
            data,
            duration_ms,
        })
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AnalysisConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during the run.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            consistency: ConsistencyFilter::new(config.min_working_age),
            deduplicator: Deduplicator::new(config.dedup_columns.iter()),
            outlier_scanner: OutlierScanner::new(config.iqr_multiplier),
            analyzer: AssociationAnalyzer::new(
                config.significance_level,
                config.yates_correction,
            ),
            cleaner: DataCleaner,
            progress_reporter: self.progress_reporter,
            config,
        })
    }
}
