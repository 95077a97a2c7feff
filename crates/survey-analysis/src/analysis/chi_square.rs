//! Chi-squared test of independence.

use super::contingency::ContingencyTable;
use crate::error::{AnalysisError, Result};
use anofox_statistics::categorical::chisq_test;
use serde::{Deserialize, Serialize};

const TEST_NAME: &str = "chi-squared";

/// Outcome of a chi-squared test of independence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
    /// Expected frequencies under independence, same shape as the table.
    pub expected: Vec<Vec<f64>>,
    /// Whether the Yates continuity correction was applied.
    pub yates_corrected: bool,
}

/// Test whether the two variables of `table` are independent.
///
/// With `yates` set, tables with exactly one degree of freedom get the
/// continuity correction: each observed count moves toward its expected
/// count by at most 0.5.
pub fn chi_square_test(table: &ContingencyTable, yates: bool) -> Result<ChiSquareResult> {
    let (r, c) = (table.n_rows(), table.n_cols());
    if r < 2 || c < 2 {
        return Err(AnalysisError::statistical(
            TEST_NAME,
            format!("contingency table is {}x{}; at least 2x2 is required", r, c),
        ));
    }

    // A zero expected frequency comes from an empty row or column
    let empty_row = table.row_totals().iter().position(|&t| t == 0);
    let empty_col = table.column_totals().iter().position(|&t| t == 0);
    if empty_row.is_some() || empty_col.is_some() {
        return Err(AnalysisError::statistical(
            TEST_NAME,
            format!(
                "expected frequency is zero at ({}, {})",
                label_at(&table.row_labels, empty_row),
                label_at(&table.column_labels, empty_col)
            ),
        ));
    }

    let dof = (r - 1) * (c - 1);
    let yates_corrected = yates && dof == 1;

    let result = chisq_test(&table.counts, yates_corrected)
        .map_err(|e| AnalysisError::statistical(TEST_NAME, e.to_string()))?;

    // In a 2x2 table |O - E| is the same in every cell. Below 0.5 the
    // correction moves every count onto its expectation.
    let (statistic, p_value) = if yates_corrected
        && (table.counts[0][0] as f64 - result.expected[0][0]).abs() < 0.5
    {
        (0.0, 1.0)
    } else {
        (result.statistic, result.p_value)
    };

    Ok(ChiSquareResult {
        statistic,
        p_value,
        dof,
        expected: result.expected,
        yates_corrected,
    })
}

fn label_at(labels: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| labels.get(i))
        .map(String::as_str)
        .unwrap_or("*")
}
