//! Data cleaning module for the survey table.
//!
//! This module provides functionality for:
//! - Defaulting missing categorical answers
//! - Normalizing work location labels
//! - Removing rows that break the age/experience rule
//! - Removing duplicate rows

mod consistency;
mod dedup;
mod imputation;

pub use consistency::{ConsistencyFilter, ConsistencyOutcome};
pub use dedup::Deduplicator;

use crate::error::{Result, ResultExt};
use crate::schema::{
    INACTIVE, MENTAL_HEALTH_CONDITION, NO_ISSUES, OFFICE, ONSITE, PHYSICAL_ACTIVITY,
    WORK_LOCATION,
};
use crate::types::CleaningReport;
use polars::prelude::*;
use tracing::{debug, info};

/// Data cleaner for the survey's categorical columns.
pub struct DataCleaner;

impl DataCleaner {
    /// Default missing answers and normalize the work location label.
    ///
    /// This includes:
    /// 1. `Physical_Activity` nulls become "Inactive"
    /// 2. `Mental_Health_Condition` nulls become "No Issues"
    /// 3. `Work_Location` "Onsite" becomes "Office"
    ///
    /// No other column is altered.
    pub fn clean(&self, df: DataFrame) -> Result<(DataFrame, CleaningReport)> {
        let mut df = df;

        info!("Cleaning categorical columns...");

        let physical_activity_defaulted =
            imputation::fill_string_nulls(&mut df, PHYSICAL_ACTIVITY, INACTIVE)
                .context("Defaulting physical activity")?;
        let mental_health_defaulted =
            imputation::fill_string_nulls(&mut df, MENTAL_HEALTH_CONDITION, NO_ISSUES)
                .context("Defaulting mental health condition")?;
        let work_location_renamed =
            imputation::replace_label(&mut df, WORK_LOCATION, ONSITE, OFFICE)
                .context("Normalizing work location")?;

        let report = CleaningReport {
            physical_activity_defaulted,
            mental_health_defaulted,
            work_location_renamed,
            inactive_count: imputation::count_label(&df, PHYSICAL_ACTIVITY, INACTIVE)?,
            no_issues_count: imputation::count_label(&df, MENTAL_HEALTH_CONDITION, NO_ISSUES)?,
        };

        debug!(
            "Defaulted {} physical activity and {} mental health values, renamed {} locations",
            report.physical_activity_defaulted,
            report.mental_health_defaulted,
            report.work_location_renamed
        );

        Ok((df, report))
    }
}
