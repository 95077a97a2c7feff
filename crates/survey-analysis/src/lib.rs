//! Remote Work Mental Health Survey Analysis
//!
//! Exploratory statistics over the "Impact of Remote Work on Mental Health"
//! survey, built with Rust and Polars.
//!
//! # Overview
//!
//! The pipeline runs a fixed sequence of stages:
//!
//! - **Summary**: descriptive statistics and null counts of the raw table
//! - **Cleaning**: missing activity and condition answers get defaults,
//!   "Onsite" becomes "Office"
//! - **Consistency**: rows with more experience than working years are dropped
//!   and the filtered table is written to disk
//! - **Deduplication**: exact duplicates over the survey columns are removed
//! - **Outlier screening**: IQR fences for `Age` and `Years_of_Experience`
//! - **Analyses**: two chi-squared tests of independence and a one-way ANOVA,
//!   each with a chart and a Spanish interpretation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use survey_analysis::{AnalysisConfig, Pipeline};
//!
//! let config = AnalysisConfig::builder()
//!     .input_path("Impact_of_Remote_Work_on_Mental_Health.csv")
//!     .significance_level(0.05)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run_from_path()?;
//!
//! for analysis in &result.analyses {
//!     println!("{} p = {:.4}: {}", analysis.question_id, analysis.test.p_value(), analysis.interpretation);
//! }
//! ```

pub mod analysis;
pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod outliers;
pub mod pipeline;
pub mod reporting;
pub mod schema;
pub mod summary;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{
    AnalysisOutcome, AssociationAnalyzer, ResearchQuestion, Significance, TestOutcome, classify,
    RESEARCH_QUESTIONS,
};
pub use charts::{BoxPlotChart, Chart, StackedBarChart};
pub use cleaner::{ConsistencyFilter, DataCleaner, Deduplicator};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use loader::{load_survey, write_survey};
pub use outliers::{OutlierScan, OutlierScanner};
pub use pipeline::{
    AnalysisStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use reporting::{AnalysisReport, ReportGenerator, format_console_report};
pub use summary::summarize;
pub use types::{
    CleaningReport, ConsistencyReport, DatasetSummary, DedupReport, OutlierReport, PipelineResult,
};
