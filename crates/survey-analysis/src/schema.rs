//! Column names and category labels of the survey dataset.
//!
//! The schema is implicit in the file header; these constants are the single
//! place where the expected names live.

use crate::error::{AnalysisError, Result};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;

pub const EMPLOYEE_ID: &str = "Employee_ID";
pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const JOB_ROLE: &str = "Job_Role";
pub const INDUSTRY: &str = "Industry";
pub const YEARS_OF_EXPERIENCE: &str = "Years_of_Experience";
pub const WORK_LOCATION: &str = "Work_Location";
pub const HOURS_WORKED_PER_WEEK: &str = "Hours_Worked_Per_Week";
pub const NUMBER_OF_VIRTUAL_MEETINGS: &str = "Number_of_Virtual_Meetings";
pub const WORK_LIFE_BALANCE_RATING: &str = "Work_Life_Balance_Rating";
pub const STRESS_LEVEL: &str = "Stress_Level";
pub const MENTAL_HEALTH_CONDITION: &str = "Mental_Health_Condition";
pub const ACCESS_TO_MENTAL_HEALTH_RESOURCES: &str = "Access_to_Mental_Health_Resources";
pub const PRODUCTIVITY_CHANGE: &str = "Productivity_Change";
pub const SOCIAL_ISOLATION_RATING: &str = "Social_Isolation_Rating";
pub const SATISFACTION_WITH_REMOTE_WORK: &str = "Satisfaction_with_Remote_Work";
pub const COMPANY_SUPPORT_FOR_REMOTE_WORK: &str = "Company_Support_for_Remote_Work";
pub const PHYSICAL_ACTIVITY: &str = "Physical_Activity";
pub const SLEEP_QUALITY: &str = "Sleep_Quality";
pub const REGION: &str = "Region";

/// Every column of a survey record, in file order.
pub const SURVEY_COLUMNS: [&str; 20] = [
    EMPLOYEE_ID,
    AGE,
    GENDER,
    JOB_ROLE,
    INDUSTRY,
    YEARS_OF_EXPERIENCE,
    WORK_LOCATION,
    HOURS_WORKED_PER_WEEK,
    NUMBER_OF_VIRTUAL_MEETINGS,
    WORK_LIFE_BALANCE_RATING,
    STRESS_LEVEL,
    MENTAL_HEALTH_CONDITION,
    ACCESS_TO_MENTAL_HEALTH_RESOURCES,
    PRODUCTIVITY_CHANGE,
    SOCIAL_ISOLATION_RATING,
    SATISFACTION_WITH_REMOTE_WORK,
    COMPANY_SUPPORT_FOR_REMOTE_WORK,
    PHYSICAL_ACTIVITY,
    SLEEP_QUALITY,
    REGION,
];

/// Columns the consistency rule does arithmetic on; they must load as numbers.
pub const NUMERIC_COLUMNS: [&str; 2] = [AGE, YEARS_OF_EXPERIENCE];

/// Default for a missing `Physical_Activity` answer.
pub const INACTIVE: &str = "Inactive";

/// Default for a missing `Mental_Health_Condition` answer.
pub const NO_ISSUES: &str = "No Issues";

/// Raw `Work_Location` label replaced during cleaning.
pub const ONSITE: &str = "Onsite";

/// Canonical synonym for [`ONSITE`].
pub const OFFICE: &str = "Office";

/// Cell contents parsed as missing when loading the CSV.
///
/// The survey encodes "no condition" and "no activity" as the literal `None`.
pub const MISSING_MARKERS: [&str; 11] = [
    "None", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "<NA>", "#N/A", "#NA",
];

/// Fail with [`AnalysisError::ColumnNotFound`] for the first expected column
/// absent from `df`.
pub fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    match columns.iter().find(|c| !present.iter().any(|p| p == *c)) {
        Some(missing) => Err(AnalysisError::ColumnNotFound((*missing).to_string())),
        None => Ok(()),
    }
}

/// Fail with [`AnalysisError::TypeConversionFailed`] for the first column
/// that did not load with a numeric dtype.
pub fn require_numeric(df: &DataFrame, columns: &[&str]) -> Result<()> {
    for name in columns {
        let dtype = df
            .column(name)
            .map_err(|_| AnalysisError::ColumnNotFound((*name).to_string()))?
            .dtype();
        if !is_numeric_dtype(dtype) {
            return Err(AnalysisError::TypeConversionFailed {
                column: (*name).to_string(),
                target_type: "number".to_string(),
                reason: format!("column was read as {}", dtype),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_columns_ok() {
        let df = df![AGE => [30i64], YEARS_OF_EXPERIENCE => [5i64]].unwrap();
        assert!(require_columns(&df, &[AGE, YEARS_OF_EXPERIENCE]).is_ok());
    }

    #[test]
    fn test_require_columns_reports_first_missing() {
        let df = df![AGE => [30i64]].unwrap();
        let err = require_columns(&df, &[AGE, GENDER, REGION]).unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnNotFound(ref c) if c == GENDER));
    }

    #[test]
    fn test_require_numeric_rejects_text_column() {
        let df = df![AGE => ["forty", "31"], YEARS_OF_EXPERIENCE => [3i64, 5]].unwrap();
        let err = require_numeric(&df, &NUMERIC_COLUMNS).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::TypeConversionFailed { ref column, .. } if column == AGE
        ));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_require_numeric_accepts_integers_and_floats() {
        let df = df![AGE => [40i64, 31], YEARS_OF_EXPERIENCE => [3.0f64, 5.5]].unwrap();
        assert!(require_numeric(&df, &NUMERIC_COLUMNS).is_ok());
    }

    #[test]
    fn test_survey_columns_are_unique() {
        let mut names = SURVEY_COLUMNS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SURVEY_COLUMNS.len());
    }
}
