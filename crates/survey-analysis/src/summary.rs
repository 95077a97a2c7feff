//! Descriptive statistics of the raw table.

use crate::error::Result;
use crate::types::{DatasetSummary, NullCount, NumericSummary};
use crate::utils::{is_numeric_dtype, mean, quantile_sorted, sample_std, sort_floats};
use polars::prelude::*;

/// Summarize every numeric column and count nulls in every column.
pub fn summarize(df: &DataFrame) -> Result<DatasetSummary> {
    let mut numeric = Vec::new();
    let mut null_counts = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let series = col.as_materialized_series();
        null_counts.push(NullCount {
            column: series.name().to_string(),
            nulls: series.null_count(),
        });

        if is_numeric_dtype(series.dtype()) {
            numeric.push(summarize_numeric(series)?);
        }
    }

    Ok(DatasetSummary {
        shape: df.shape(),
        numeric,
        null_counts,
    })
}

fn summarize_numeric(series: &Series) -> Result<NumericSummary> {
    let float_series = series.cast(&DataType::Float64)?;
    let mut values: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
    sort_floats(&mut values);

    Ok(NumericSummary {
        column: series.name().to_string(),
        count: values.len(),
        mean: mean(&values),
        std: sample_std(&values),
        min: values.first().copied().unwrap_or(f64::NAN),
        q1: quantile_sorted(&values, 0.25),
        median: quantile_sorted(&values, 0.5),
        q3: quantile_sorted(&values, 0.75),
        max: values.last().copied().unwrap_or(f64::NAN),
    })
}
