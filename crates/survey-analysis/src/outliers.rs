//! Outlier screening module.
//!
//! Flags values outside the Tukey fences `[Q1 - k*IQR, Q3 + k*IQR]`.
//! Screening is read-only: the table is never modified.

use crate::error::{AnalysisError, Result};
use crate::types::OutlierReport;
use crate::utils::{f64_values, quantile_sorted, sort_floats};
use polars::prelude::*;
use tracing::debug;

/// Fences and flagged rows of one column.
#[derive(Debug, Clone)]
pub struct OutlierScan {
    pub report: OutlierReport,
    /// Rows outside the fences, in original order.
    pub rows: DataFrame,
}

/// Screens numeric columns for outliers with the IQR rule.
pub struct OutlierScanner {
    multiplier: f64,
}

impl Default for OutlierScanner {
    fn default() -> Self {
        Self { multiplier: 1.5 }
    }
}

impl OutlierScanner {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    /// Compute the fences of `column` and collect the rows outside them.
    ///
    /// Nulls are ignored when computing quartiles and never flagged.
    pub fn scan(&self, df: &DataFrame, column: &str) -> Result<OutlierScan> {
        let values = f64_values(df, column)?;

        let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
        if sorted.is_empty() {
            return Err(AnalysisError::NoValidValues(column.to_string()));
        }
        sort_floats(&mut sorted);

        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;

        let mut report = OutlierReport {
            column: column.to_string(),
            q1,
            q3,
            iqr,
            lower_bound: q1 - self.multiplier * iqr,
            upper_bound: q3 + self.multiplier * iqr,
            outlier_count: 0,
        };

        let flags: Vec<bool> = values
            .iter()
            .map(|v| v.map(|val| report.is_outlier(val)).unwrap_or(false))
            .collect();
        let mask = BooleanChunked::from_slice("outlier".into(), &flags);
        let rows = df.filter(&mask)?;
        report.outlier_count = rows.height();

        debug!(
            "Outliers in '{}': {} outside [{:.2}, {:.2}]",
            column, report.outlier_count, report.lower_bound, report.upper_bound
        );

        Ok(OutlierScan { report, rows })
    }
}
