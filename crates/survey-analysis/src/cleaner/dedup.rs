//! Exact duplicate removal over a fixed set of key columns.

use crate::error::Result;
use crate::types::DedupReport;
use crate::utils::string_values;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Removes rows that repeat an earlier row on every key column.
pub struct Deduplicator {
    key_columns: Vec<String>,
}

impl Deduplicator {
    pub fn new<I, S>(key_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_columns: key_columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Keep the first occurrence of each key, preserving row order.
    ///
    /// Nulls compare equal to nulls.
    pub fn deduplicate(&self, df: &DataFrame) -> Result<(DataFrame, DedupReport)> {
        let columns: Vec<Vec<Option<String>>> = self
            .key_columns
            .iter()
            .map(|name| string_values(df, name))
            .collect::<Result<_>>()?;

        let mut seen: HashSet<Vec<Option<&str>>> = HashSet::with_capacity(df.height());
        let keep: Vec<bool> = (0..df.height())
            .map(|row| {
                let key: Vec<Option<&str>> =
                    columns.iter().map(|col| col[row].as_deref()).collect();
                seen.insert(key)
            })
            .collect();

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let deduplicated = df.filter(&mask)?;

        let report = DedupReport {
            key_columns: self.key_columns.clone(),
            rows_before: df.height(),
            rows_after: deduplicated.height(),
            removed_count: df.height() - deduplicated.height(),
        };

        if report.removed_count > 0 {
            debug!("Removed {} duplicate rows", report.removed_count);
        } else {
            debug!("No duplicate rows found");
        }

        Ok((deduplicated, report))
    }
}
