//! Cross-tabulation of two categorical columns.

use crate::error::{AnalysisError, Result};
use crate::utils::string_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Observed counts of every (row label, column label) pair.
///
/// Labels are sorted lexicographically; rows with a null in either column
/// are not counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub row_variable: String,
    pub column_variable: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `counts[i][j]` is the number of records with row label `i` and column label `j`.
    pub counts: Vec<Vec<usize>>,
}

impl ContingencyTable {
    /// Build the cross-tabulation of `row_column` against `col_column`.
    pub fn from_columns(df: &DataFrame, row_column: &str, col_column: &str) -> Result<Self> {
        let rows = string_values(df, row_column)?;
        let cols = string_values(df, col_column)?;

        let mut pairs: BTreeMap<(String, String), usize> = BTreeMap::new();
        for (row, col) in rows.into_iter().zip(cols) {
            let (Some(row), Some(col)) = (row, col) else {
                continue;
            };
            *pairs.entry((row, col)).or_insert(0) += 1;
        }

        if pairs.is_empty() {
            return Err(AnalysisError::NoValidValues(format!(
                "{} x {}",
                row_column, col_column
            )));
        }

        let mut row_labels: Vec<String> = pairs.keys().map(|(r, _)| r.clone()).collect();
        row_labels.dedup();
        let mut column_labels: Vec<String> = pairs.keys().map(|(_, c)| c.clone()).collect();
        column_labels.sort();
        column_labels.dedup();

        let mut counts = vec![vec![0usize; column_labels.len()]; row_labels.len()];
        for ((row, col), count) in &pairs {
            // Both labels come from `pairs`, so the searches always succeed
            if let (Ok(i), Ok(j)) = (
                row_labels.binary_search(row),
                column_labels.binary_search(col),
            ) {
                counts[i][j] = *count;
            }
        }

        Ok(Self {
            row_variable: row_column.to_string(),
            column_variable: col_column.to_string(),
            row_labels,
            column_labels,
            counts,
        })
    }

    /// Build a table directly from counts.
    pub fn from_counts(
        row_labels: Vec<String>,
        column_labels: Vec<String>,
        counts: Vec<Vec<usize>>,
    ) -> Self {
        Self {
            row_variable: String::new(),
            column_variable: String::new(),
            row_labels,
            column_labels,
            counts,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.counts.len()
    }

    pub fn n_cols(&self) -> usize {
        self.counts.first().map(|row| row.len()).unwrap_or(0)
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<usize> {
        (0..self.n_cols())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}
