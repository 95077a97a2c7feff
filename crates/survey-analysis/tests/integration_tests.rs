//! Integration tests for the survey analysis pipeline.
//!
//! These tests run the pipeline end to end on a small sample of the survey.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use survey_analysis::schema::{
    AGE, MENTAL_HEALTH_CONDITION, PHYSICAL_ACTIVITY, WORK_LOCATION, YEARS_OF_EXPERIENCE,
};
use survey_analysis::utils::{f64_values, string_values};
use survey_analysis::{
    AnalysisConfig, AnalysisReport, AnalysisStage, Chart, ConsistencyFilter, DataCleaner,
    Deduplicator, Pipeline, PipelineResult, ReportGenerator, Significance, TestOutcome,
    format_console_report, load_survey, write_survey,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn sample_path() -> PathBuf {
    fixtures_path().join("survey_sample.csv")
}

fn run_in_memory() -> PipelineResult {
    let config = AnalysisConfig::builder()
        .input_path(sample_path())
        .save_to_disk(false)
        .build()
        .unwrap();

    Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run_from_path()
        .expect("pipeline should succeed on the sample")
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[test]
fn test_full_pipeline_on_sample() {
    let result = run_in_memory();

    assert_eq!(result.summary.shape, (38, 20));
    assert_eq!(result.summary.total_nulls(), 23);

    assert_eq!(result.cleaning.mental_health_defaulted, 10);
    assert_eq!(result.cleaning.physical_activity_defaulted, 13);
    assert_eq!(result.cleaning.work_location_renamed, 13);
    assert_eq!(result.cleaning.inactive_count, 13);
    assert_eq!(result.cleaning.no_issues_count, 10);

    assert_eq!(result.consistency.removed_count, 3);
    assert_eq!(result.filtered_shape, (35, 20));
    assert_eq!(
        string_values(&result.inconsistent_rows, "Employee_ID").unwrap(),
        vec![
            Some("EMP0004".to_string()),
            Some("EMP0011".to_string()),
            Some("EMP0021".to_string()),
        ]
    );

    assert_eq!(result.dedup.removed_count, 2);
    assert_eq!(result.data.shape(), (33, 20));
    assert!(result.output_path.is_none());

    let screened: Vec<&str> = result
        .outliers
        .iter()
        .map(|scan| scan.report.column.as_str())
        .collect();
    assert_eq!(screened, vec![AGE, YEARS_OF_EXPERIENCE]);

    let ids: Vec<&str> = result
        .analyses
        .iter()
        .map(|a| a.question_id.as_str())
        .collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[test]
fn test_pipeline_invariants_hold() {
    let result = run_in_memory();
    let df = &result.data;

    assert_eq!(df.column(MENTAL_HEALTH_CONDITION).unwrap().null_count(), 0);
    assert_eq!(df.column(PHYSICAL_ACTIVITY).unwrap().null_count(), 0);

    let locations = string_values(df, WORK_LOCATION).unwrap();
    assert!(locations.iter().flatten().all(|l| l != "Onsite"));

    let filter = ConsistencyFilter::new(15);
    let ages = f64_values(df, AGE).unwrap();
    let years = f64_values(df, YEARS_OF_EXPERIENCE).unwrap();
    for (age, years) in ages.into_iter().zip(years) {
        if let (Some(age), Some(years)) = (age, years) {
            assert!(!filter.violates(age, years), "({age}, {years}) retained");
        }
    }

    // Deduplicating the analysed table again changes nothing
    let (again, report) = Deduplicator::new(df.get_column_names().iter().map(|c| c.to_string()))
        .deduplicate(df)
        .unwrap();
    assert_eq!(report.removed_count, 0);
    assert!(again.equals_missing(df));
}

#[test]
fn test_analyses_are_consistent() {
    let result = run_in_memory();

    for analysis in &result.analyses {
        let p = analysis.test.p_value();
        assert!((0.0..=1.0).contains(&p), "p-value {p} out of range");

        let expected_significance = if p > 0.05 {
            Significance::NotSignificant
        } else {
            Significance::Significant
        };
        assert_eq!(analysis.significance, expected_significance);
    }

    match (&result.analyses[0].test, &result.analyses[0].chart) {
        (TestOutcome::ChiSquare { table, result: chi }, Chart::StackedBar(chart)) => {
            assert_eq!(table.row_labels, vec!["Hybrid", "Office", "Remote"]);
            assert_eq!(chi.dof, (table.n_rows() - 1) * (table.n_cols() - 1));
            assert_eq!(chart.categories, table.row_labels);
            assert_eq!(chart.totals().iter().sum::<usize>(), 33);
        }
        other => panic!("unexpected outcome for A: {other:?}"),
    }

    match (&result.analyses[2].test, &result.analyses[2].chart) {
        (TestOutcome::Anova { groups, table }, Chart::BoxPlot(chart)) => {
            assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), 33);
            assert_eq!(table.factor.df, (groups.len() - 1) as f64);
            assert_eq!(table.residual.df, (33 - groups.len()) as f64);
            assert_eq!(chart.groups.len(), groups.len());
        }
        other => panic!("unexpected outcome for C: {other:?}"),
    }
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[test]
fn test_pipeline_writes_filtered_table() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("survey_clean.csv");
    let config = AnalysisConfig::builder()
        .input_path(sample_path())
        .output_path(&output)
        .build()
        .unwrap();

    let result = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run_from_path()
        .unwrap();

    assert_eq!(result.output_path.as_deref(), Some(output.as_path()));
    let written = load_survey(&output).unwrap();
    // Written after the consistency filter, before deduplication
    assert_eq!(written.shape(), (35, 20));
    // The source file is left untouched
    assert_eq!(load_survey(&sample_path()).unwrap().height(), 38);
}

#[test]
fn test_write_then_reload_matches_cleaned_table() {
    let raw = load_survey(&sample_path()).unwrap();
    let (cleaned, _) = DataCleaner.clean(raw).unwrap();
    let mut filtered = ConsistencyFilter::new(15).apply(&cleaned).unwrap().kept;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    write_survey(&mut filtered, &path).unwrap();

    let reloaded = load_survey(&path).unwrap();
    assert_eq!(reloaded.get_column_names(), filtered.get_column_names());
    assert!(reloaded.equals_missing(&filtered));
}

#[test]
fn test_default_output_path_is_beside_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("survey.csv");
    std::fs::copy(sample_path(), &input).unwrap();

    let config = AnalysisConfig::builder().input_path(&input).build().unwrap();
    let result = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run_from_path()
        .unwrap();

    let expected = dir.path().join("survey_clean.csv");
    assert_eq!(result.output_path, Some(expected.clone()));
    assert!(expected.exists());
}

// ============================================================================
// Reporting Tests
// ============================================================================

#[test]
fn test_json_report_written() {
    let result = run_in_memory();
    let report = AnalysisReport::from_result(&sample_path(), &result);

    let dir = tempfile::tempdir().unwrap();
    let path = ReportGenerator::new(dir.path())
        .write_report_to_file(&report, "survey_sample")
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "survey_sample_report.json");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["final_shape"], serde_json::json!([33, 20]));
    assert_eq!(json["consistency"]["removed_count"], 3);
    assert_eq!(json["analyses"].as_array().unwrap().len(), 3);
    assert_eq!(json["analyses"][0]["test"]["test"], "chi_square");
    assert_eq!(json["analyses"][2]["chart"]["kind"], "box_plot");
    assert!(json["generated_at"].is_string());
}

#[test]
fn test_console_report_follows_stage_order() {
    let result = run_in_memory();
    let text = format_console_report(&result, Some(40));

    let markers = [
        "Resumen estadístico del dataset:",
        "Conteo de valores nulos por columna:",
        "Cantidad de empleados inactivos: 13, cantidad sin problemas mentales: 10",
        "Filas con incoherencias de edad-experiencia:",
        "Número de filas: 35, Número de columnas: 20",
        "Número de filas tras eliminar duplicados: 33, Número de columnas: 20",
        "Outliers en la columna Age",
        "Outliers en la columna Years_of_Experience",
        "Salud Mental y Localización del Trabajo",
        "Género y Satisfacción con el Trabajo Remoto",
        "Resultados ANOVA:",
    ];
    let mut last = 0;
    for marker in markers {
        let pos = text[last..]
            .find(marker)
            .unwrap_or_else(|| panic!("missing or out of order: {marker}"));
        last += pos + marker.len();
    }

    for analysis in &result.analyses {
        assert!(text.contains(&analysis.interpretation));
    }
}

#[test]
fn test_progress_stages_in_order() {
    let stages = Arc::new(Mutex::new(Vec::new()));
    let sink = stages.clone();
    let config = AnalysisConfig::builder()
        .input_path(sample_path())
        .save_to_disk(false)
        .build()
        .unwrap();

    Pipeline::builder()
        .config(config)
        .on_progress(move |update| {
            let mut stages = sink.lock().unwrap();
            if stages.last() != Some(&update.stage) {
                stages.push(update.stage);
            }
        })
        .build()
        .unwrap()
        .run_from_path()
        .unwrap();

    assert_eq!(
        *stages.lock().unwrap(),
        vec![
            AnalysisStage::Loading,
            AnalysisStage::Summarizing,
            AnalysisStage::Cleaning,
            AnalysisStage::ConsistencyCheck,
            AnalysisStage::Deduplication,
            AnalysisStage::OutlierScreening,
            AnalysisStage::Analysis,
            AnalysisStage::Complete,
        ]
    );
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_missing_column_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("partial.csv");
    std::fs::write(&input, "Employee_ID,Age\nEMP0001,30\n").unwrap();

    let config = AnalysisConfig::builder()
        .input_path(&input)
        .save_to_disk(false)
        .build()
        .unwrap();
    let err = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run_from_path()
        .unwrap_err();

    assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
}

#[test]
fn test_text_in_age_column_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("survey.csv");
    let sample = std::fs::read_to_string(sample_path()).unwrap();
    std::fs::write(&input, sample.replacen("EMP0001,43,", "EMP0001,forty,", 1)).unwrap();

    let config = AnalysisConfig::builder()
        .input_path(&input)
        .build()
        .unwrap();
    let err = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run_from_path()
        .unwrap_err();

    assert_eq!(err.error_code(), "TYPE_CONVERSION_FAILED");
    assert!(err.to_string().contains("Age"));
    assert!(!dir.path().join("survey_clean.csv").exists());
}

#[test]
fn test_run_on_in_memory_frame() {
    let df = load_survey(&sample_path()).unwrap();
    let config = AnalysisConfig::builder()
        .save_to_disk(false)
        .significance_level(0.5)
        .build()
        .unwrap();

    let result = Pipeline::builder().config(config).build().unwrap().run(df).unwrap();

    assert!(result.analyses.iter().all(|a| a.significance_level == 0.5));
    assert_eq!(result.data.height(), 33);
}
