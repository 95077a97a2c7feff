//! Age/experience consistency rule.
//!
//! A respondent cannot have more years of experience than years lived past
//! the minimum working age.

use crate::error::Result;
use crate::schema::{AGE, NUMERIC_COLUMNS, YEARS_OF_EXPERIENCE, require_numeric};
use crate::types::ConsistencyReport;
use crate::utils::f64_values;
use polars::prelude::*;
use tracing::debug;

/// Rows split by the consistency rule.
#[derive(Debug, Clone)]
pub struct ConsistencyOutcome {
    /// Rows satisfying `Years_of_Experience <= Age - min_working_age`.
    pub kept: DataFrame,
    /// Rows violating the rule, in original order.
    pub invalid: DataFrame,
    pub report: ConsistencyReport,
}

/// Removes rows whose experience exceeds the working years implied by age.
pub struct ConsistencyFilter {
    min_working_age: i64,
}

impl ConsistencyFilter {
    pub fn new(min_working_age: i64) -> Self {
        Self { min_working_age }
    }

    /// Whether a single (age, experience) pair violates the rule.
    pub fn violates(&self, age: f64, years_of_experience: f64) -> bool {
        years_of_experience > age - self.min_working_age as f64
    }

    /// Split `df` into consistent and inconsistent rows.
    ///
    /// A row with a null age or experience is never flagged. Both columns
    /// must be numeric.
    pub fn apply(&self, df: &DataFrame) -> Result<ConsistencyOutcome> {
        require_numeric(df, &NUMERIC_COLUMNS)?;
        let ages = f64_values(df, AGE)?;
        let experience = f64_values(df, YEARS_OF_EXPERIENCE)?;

        let invalid_flags: Vec<bool> = ages
            .iter()
            .zip(experience.iter())
            .map(|(age, years)| match (age, years) {
                (Some(age), Some(years)) => self.violates(*age, *years),
                _ => false,
            })
            .collect();
        let keep_flags: Vec<bool> = invalid_flags.iter().map(|flag| !flag).collect();

        let invalid_mask = BooleanChunked::from_slice("invalid".into(), &invalid_flags);
        let keep_mask = BooleanChunked::from_slice("keep".into(), &keep_flags);

        let invalid = df.filter(&invalid_mask)?;
        let kept = df.filter(&keep_mask)?;

        debug!(
            "Consistency filter (min age {}): {} of {} rows inconsistent",
            self.min_working_age,
            invalid.height(),
            df.height()
        );

        let report = ConsistencyReport {
            min_working_age: self.min_working_age,
            rows_before: df.height(),
            rows_after: kept.height(),
            removed_count: invalid.height(),
        };

        Ok(ConsistencyOutcome {
            kept,
            invalid,
            report,
        })
    }
}
