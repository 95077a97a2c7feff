//! Human-readable console report, in Spanish.

use crate::analysis::{AnalysisOutcome, AnovaTable, ChiSquareResult, ContingencyTable, TestOutcome};
use crate::charts;
use crate::types::{DatasetSummary, OutlierReport, PipelineResult};
use std::fmt::Write;

/// Width of rendered charts, in terminal cells.
pub const DEFAULT_CHART_WIDTH: usize = 50;

/// Format every stage of `result` in pipeline order.
///
/// Charts are drawn inline when `chart_width` is set.
pub fn format_console_report(result: &PipelineResult, chart_width: Option<usize>) -> String {
    let mut out = String::new();

    write_summary(&mut out, &result.summary);

    let cleaning = &result.cleaning;
    let _ = writeln!(
        out,
        "\nCantidad de empleados inactivos: {}, cantidad sin problemas mentales: {}",
        cleaning.inactive_count, cleaning.no_issues_count
    );
    let _ = writeln!(
        out,
        "Valores completados: Physical_Activity {}, Mental_Health_Condition {}; localizaciones renombradas: {}",
        cleaning.physical_activity_defaulted,
        cleaning.mental_health_defaulted,
        cleaning.work_location_renamed
    );

    let _ = writeln!(out, "\nFilas con incoherencias de edad-experiencia:");
    if result.inconsistent_rows.height() == 0 {
        let _ = writeln!(out, "  (ninguna)");
    } else {
        let _ = writeln!(out, "{}", result.inconsistent_rows);
    }
    let _ = writeln!(
        out,
        "Filas eliminadas: {} (edad mínima de trabajo {})",
        result.consistency.removed_count, result.consistency.min_working_age
    );

    let (rows, cols) = result.filtered_shape;
    let _ = writeln!(out, "\nNúmero de filas: {}, Número de columnas: {}", rows, cols);
    if let Some(path) = &result.output_path {
        let _ = writeln!(out, "Datos limpios guardados en {}", path.display());
    }

    let (rows, cols) = result.data.shape();
    let _ = writeln!(
        out,
        "\nNúmero de filas tras eliminar duplicados: {}, Número de columnas: {}",
        rows, cols
    );

    for scan in &result.outliers {
        write_outliers(&mut out, &scan.report);
        if scan.report.outlier_count > 0 {
            let _ = writeln!(out, "{}", scan.rows);
        }
    }

    for analysis in &result.analyses {
        write_analysis(&mut out, analysis, chart_width);
    }

    out
}

fn write_summary(out: &mut String, summary: &DatasetSummary) {
    let _ = writeln!(out, "Resumen estadístico del dataset:");
    let _ = writeln!(
        out,
        "{:<34} {:>8} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for col in &summary.numeric {
        let _ = writeln!(
            out,
            "{:<34} {:>8} {:>10.3} {:>10.3} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
            col.column, col.count, col.mean, col.std, col.min, col.q1, col.median, col.q3, col.max
        );
    }

    let _ = writeln!(out, "\nConteo de valores nulos por columna:");
    for null in &summary.null_counts {
        let _ = writeln!(out, "{:<34} {:>8}", null.column, null.nulls);
    }
}

fn write_outliers(out: &mut String, report: &OutlierReport) {
    let _ = writeln!(out, "\nOutliers en la columna {}", report.column);
    let _ = writeln!(
        out,
        "Q1 = {:.2}, Q3 = {:.2}, IQR = {:.2}, límites = [{:.2}, {:.2}], outliers = {}",
        report.q1, report.q3, report.iqr, report.lower_bound, report.upper_bound, report.outlier_count
    );
}

fn write_analysis(out: &mut String, analysis: &AnalysisOutcome, chart_width: Option<usize>) {
    let _ = writeln!(out, "\n{}", "=".repeat(80));
    let _ = writeln!(out, "Análisis {}: {}", analysis.question_id, analysis.description);
    let _ = writeln!(out, "{}", "=".repeat(80));

    if let Some(width) = chart_width {
        let _ = writeln!(out, "{}", charts::render(&analysis.chart, width));
    }

    match &analysis.test {
        TestOutcome::ChiSquare { table, result } => write_chi_square(out, table, result),
        TestOutcome::Anova { table, .. } => write_anova(out, table),
    }

    let _ = writeln!(out, "\nInterpretación (α = {}):", analysis.significance_level);
    let _ = writeln!(out, "{}", analysis.interpretation);
}

fn write_chi_square(out: &mut String, table: &ContingencyTable, result: &ChiSquareResult) {
    let _ = writeln!(out, "Chi-cuadrado: {}", result.statistic);
    let _ = writeln!(out, "Valor p: {}", result.p_value);
    let _ = writeln!(out, "Grados de libertad: {}", result.dof);
    if result.yates_corrected {
        let _ = writeln!(out, "(con corrección de continuidad de Yates)");
    }

    let _ = writeln!(out, "Frecuencias esperadas:");
    let pad = table
        .row_labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    let _ = write!(out, "{:pad$}", "", pad = pad);
    for label in &table.column_labels {
        let _ = write!(out, " {:>14}", label);
    }
    let _ = writeln!(out);
    for (label, row) in table.row_labels.iter().zip(&result.expected) {
        let _ = write!(out, "{:<pad$}", label, pad = pad);
        for value in row {
            let _ = write!(out, " {:>14.4}", value);
        }
        let _ = writeln!(out);
    }
}

fn write_anova(out: &mut String, table: &AnovaTable) {
    let _ = writeln!(out, "Resultados ANOVA:");
    let _ = writeln!(
        out,
        "{:<40} {:>14} {:>8} {:>10} {:>10}",
        "", "sum_sq", "df", "F", "PR(>F)"
    );
    for row in table.rows() {
        let f = row.f_statistic.map(|f| format!("{:.6}", f)).unwrap_or_else(|| "NaN".to_string());
        let p = row.p_value.map(|p| format!("{:.6}", p)).unwrap_or_else(|| "NaN".to_string());
        let _ = writeln!(
            out,
            "{:<40} {:>14.4} {:>8.1} {:>10} {:>10}",
            row.source, row.sum_sq, row.df, f, p
        );
    }
}
