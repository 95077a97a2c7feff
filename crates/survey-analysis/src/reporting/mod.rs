//! Report generation module.
//!
//! Results leave the pipeline in two forms:
//! - a Spanish console report for people ([`format_console_report`])
//! - a JSON [`AnalysisReport`] for `--json` and `--emit-report`

mod console;
mod generator;

pub use console::{DEFAULT_CHART_WIDTH, format_console_report};
pub use generator::{AnalysisReport, ReportGenerator};
