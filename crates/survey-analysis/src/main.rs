//! CLI entry point for the survey analysis.

use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::{Path, PathBuf};
use survey_analysis::charts::export_json;
use survey_analysis::config::DEFAULT_INPUT_PATH;
use survey_analysis::reporting::DEFAULT_CHART_WIDTH;
use survey_analysis::{
    AnalysisConfig, AnalysisReport, Pipeline, PipelineResult, ReportGenerator,
    format_console_report,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Remote work and mental health survey analysis",
    long_about = "Cleans the remote work survey, screens it for outliers and answers three \
                  research questions with chi-squared and ANOVA tests.\n\n\
                  EXAMPLES:\n  \
                  # Full analysis of the default file\n  \
                  survey-analysis\n\n  \
                  # Custom input and output\n  \
                  survey-analysis -i data/survey.csv -o out/survey_clean.csv\n\n  \
                  # Machine-readable output\n  \
                  survey-analysis --json | jq '.analyses[].interpretation'"
)]
struct Args {
    /// Path to the survey CSV file
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Where to write the filtered table
    ///
    /// Defaults to "<input_stem>_clean.csv" next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum working age for the age/experience rule
    #[arg(long, default_value = "15")]
    min_working_age: i64,

    /// Significance level for the hypothesis tests
    #[arg(long, default_value = "0.05")]
    alpha: f64,

    /// IQR multiplier for the outlier fences
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Disable the Yates continuity correction on 2x2 tables
    #[arg(long)]
    no_yates: bool,

    /// Do not write the filtered table
    #[arg(long)]
    no_save: bool,

    /// Export chart models as JSON files to this directory
    #[arg(long)]
    charts_dir: Option<PathBuf>,

    /// Do not draw charts in the console report
    #[arg(long)]
    no_charts: bool,

    /// Output JSON to stdout instead of the console report
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the report directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Directory for the JSON report
    #[arg(long, default_value = "./outputs")]
    report_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    let pipeline = build_pipeline(&args, config)?;

    info!("{}", "=".repeat(80));
    info!("Starting survey analysis...");
    info!("{}", "=".repeat(80));

    match pipeline.run_from_path() {
        Ok(result) => handle_pipeline_output(&result, &args),
        Err(e) => {
            error!("Analysis failed: {}", e);
            Err(anyhow!("Analysis failed [{}]: {}", e.error_code(), e))
        }
    }
}

fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .input_path(&args.input)
        .save_to_disk(!args.no_save)
        .min_working_age(args.min_working_age)
        .significance_level(args.alpha)
        .iqr_multiplier(args.iqr_multiplier)
        .yates_correction(!args.no_yates);

    if let Some(ref output) = args.output {
        builder = builder.output_path(output);
    }

    Ok(builder.build()?)
}

fn build_pipeline(args: &Args, config: AnalysisConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: Print the Spanish console report to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON report to file, also together with `--json`
/// - `--charts-dir`: Write one JSON file per chart
fn handle_pipeline_output(result: &PipelineResult, args: &Args) -> Result<()> {
    if let Some(ref dir) = args.charts_dir {
        for analysis in &result.analyses {
            let stem = format!("chart_{}", analysis.question_id.to_lowercase());
            let path = export_json(&analysis.chart, dir, &stem)?;
            info!("Chart written to: {}", path.display());
        }
    }

    let report = AnalysisReport::from_result(&args.input, result);

    if args.emit_report {
        let generator = ReportGenerator::new(&args.report_dir);
        let report_path = generator.write_report_to_file(&report, &extract_file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let chart_width = (!args.no_charts).then_some(DEFAULT_CHART_WIDTH);
    print!("{}", format_console_report(result, chart_width));

    println!("{}", "=".repeat(80));
    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("survey")
        .to_string()
}
