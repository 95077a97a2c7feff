//! One-way analysis of variance.

use crate::error::{AnalysisError, Result};
use crate::utils::{f64_values, string_values};
use anofox_statistics::parametric::anova::{AnovaKind, one_way_anova as fisher_one_way};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TEST_NAME: &str = "one-way ANOVA";

/// Label of the error term row in an [`AnovaTable`].
pub const RESIDUAL_ROW: &str = "Residual";

/// Numeric values of one column split by the labels of another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedValues {
    pub value_variable: String,
    pub group_variable: String,
    /// `(label, values)` pairs sorted by label; values keep row order.
    pub groups: Vec<(String, Vec<f64>)>,
}

impl GroupedValues {
    /// Split `value_column` by `group_column`, skipping rows with a null in either.
    pub fn from_columns(df: &DataFrame, value_column: &str, group_column: &str) -> Result<Self> {
        let values = f64_values(df, value_column)?;
        let labels = string_values(df, group_column)?;

        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (value, label) in values.into_iter().zip(labels) {
            if let (Some(value), Some(label)) = (value, label) {
                groups.entry(label).or_default().push(value);
            }
        }

        if groups.is_empty() {
            return Err(AnalysisError::NoValidValues(format!(
                "{} by {}",
                value_column, group_column
            )));
        }

        Ok(Self {
            value_variable: value_column.to_string(),
            group_variable: group_column.to_string(),
            groups: groups.into_iter().collect(),
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(label, _)| label.as_str())
    }

    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|(_, values)| values.len()).sum()
    }
}

/// One row of an ANOVA table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaRow {
    pub source: String,
    pub sum_sq: f64,
    pub df: f64,
    /// Absent on the residual row.
    pub f_statistic: Option<f64>,
    pub p_value: Option<f64>,
}

/// Factor and residual rows of a one-way ANOVA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaTable {
    pub factor: AnovaRow,
    pub residual: AnovaRow,
}

impl AnovaTable {
    pub fn f_statistic(&self) -> f64 {
        self.factor.f_statistic.unwrap_or(f64::NAN)
    }

    pub fn p_value(&self) -> f64 {
        self.factor.p_value.unwrap_or(f64::NAN)
    }

    pub fn rows(&self) -> [&AnovaRow; 2] {
        [&self.factor, &self.residual]
    }
}

/// Test whether the group means of `data` are equal.
///
/// The factor row is named `C(<group variable>)`. Every group needs at
/// least two values.
pub fn one_way_anova(data: &GroupedValues) -> Result<AnovaTable> {
    let k = data.groups.len();
    if k < 2 {
        return Err(AnalysisError::statistical(
            TEST_NAME,
            format!("need at least two groups, found {}", k),
        ));
    }

    let n_total = data.total_count();
    if n_total <= k {
        return Err(AnalysisError::statistical(
            TEST_NAME,
            format!("{} observations are not enough for {} groups", n_total, k),
        ));
    }

    let group_refs: Vec<&[f64]> = data
        .groups
        .iter()
        .map(|(_, values)| values.as_slice())
        .collect();
    let result = fisher_one_way(&group_refs, AnovaKind::Fisher)
        .map_err(|e| AnalysisError::statistical(TEST_NAME, e.to_string()))?;

    let ss_between = result.ss_between.unwrap_or(f64::NAN);
    let ss_within = result.ss_within.unwrap_or(f64::NAN);

    // Constant data leaves F undefined; report the limits instead
    let (f_statistic, p_value) = if ss_within == 0.0 && ss_between == 0.0 {
        (0.0, 1.0)
    } else if ss_within == 0.0 {
        (f64::INFINITY, 0.0)
    } else {
        (result.statistic, result.p_value)
    };

    Ok(AnovaTable {
        factor: AnovaRow {
            source: format!("C({})", data.group_variable),
            sum_sq: ss_between,
            df: result.df_between,
            f_statistic: Some(f_statistic),
            p_value: Some(p_value),
        },
        residual: AnovaRow {
            source: RESIDUAL_ROW.to_string(),
            sum_sq: ss_within,
            df: result.df_within,
            f_statistic: None,
            p_value: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grouped(groups: Vec<(&str, Vec<f64>)>) -> GroupedValues {
        GroupedValues {
            value_variable: "Age".to_string(),
            group_variable: "Satisfaction".to_string(),
            groups: groups
                .into_iter()
                .map(|(label, values)| (label.to_string(), values))
                .collect(),
        }
    }

    #[test]
    fn test_from_columns_groups_and_sorts() {
        let df = df![
            "Age" => [Some(30i64), Some(40), None, Some(50), Some(25)],
            "Satisfaction" => [Some("Unsatisfied"), Some("Neutral"), Some("Neutral"), Some("Unsatisfied"), None],
        ]
        .unwrap();

        let data = GroupedValues::from_columns(&df, "Age", "Satisfaction").unwrap();

        assert_eq!(data.labels().collect::<Vec<_>>(), vec!["Neutral", "Unsatisfied"]);
        assert_eq!(data.groups[0].1, vec![40.0]);
        assert_eq!(data.groups[1].1, vec![30.0, 50.0]);
        assert_eq!(data.total_count(), 3);
    }

    #[test]
    fn test_identical_groups() {
        let data = grouped(vec![
            ("a", vec![1.0, 2.0, 3.0]),
            ("b", vec![1.0, 2.0, 3.0]),
            ("c", vec![1.0, 2.0, 3.0]),
        ]);

        let table = one_way_anova(&data).unwrap();

        assert!(table.f_statistic().abs() < 1e-12);
        assert!((table.p_value() - 1.0).abs() < 1e-12);
        assert_eq!(table.factor.df, 2.0);
        assert_eq!(table.residual.df, 6.0);
        assert!((table.residual.sum_sq - 6.0).abs() < 1e-12);
        assert_eq!(table.factor.source, "C(Satisfaction)");
        assert_eq!(table.residual.source, RESIDUAL_ROW);
    }

    #[test]
    fn test_known_f_statistic() {
        // Means 2, 5, 8; grand mean 5
        // SS_between = 3 * (9 + 0 + 9) = 54, SS_within = 3 * 2 = 6
        // F = (54 / 2) / (6 / 6) = 27
        let data = grouped(vec![
            ("a", vec![1.0, 2.0, 3.0]),
            ("b", vec![4.0, 5.0, 6.0]),
            ("c", vec![7.0, 8.0, 9.0]),
        ]);

        let table = one_way_anova(&data).unwrap();

        assert!((table.factor.sum_sq - 54.0).abs() < 1e-10);
        assert!((table.residual.sum_sq - 6.0).abs() < 1e-10);
        assert!((table.f_statistic() - 27.0).abs() < 1e-10);
        assert!(table.p_value() < 0.01);
    }

    #[test]
    fn test_constant_values_everywhere() {
        let data = grouped(vec![("a", vec![5.0, 5.0]), ("b", vec![5.0, 5.0])]);
        let table = one_way_anova(&data).unwrap();
        assert_eq!(table.f_statistic(), 0.0);
        assert_eq!(table.p_value(), 1.0);
    }

    #[test]
    fn test_constant_within_groups() {
        let data = grouped(vec![("a", vec![1.0, 1.0]), ("b", vec![3.0, 3.0])]);
        let table = one_way_anova(&data).unwrap();
        assert!(table.f_statistic().is_infinite());
        assert_eq!(table.p_value(), 0.0);
    }

    #[test]
    fn test_single_group_fails() {
        let err = one_way_anova(&grouped(vec![("a", vec![1.0, 2.0])])).unwrap_err();
        assert_eq!(err.error_code(), "STATISTICAL_TEST_FAILED");
    }

    #[test]
    fn test_singleton_group_fails() {
        let data = grouped(vec![("a", vec![1.0, 2.0, 3.0]), ("b", vec![4.0])]);
        let err = one_way_anova(&data).unwrap_err();
        assert_eq!(err.error_code(), "STATISTICAL_TEST_FAILED");
    }

    #[test]
    fn test_too_few_observations_fails() {
        let err = one_way_anova(&grouped(vec![("a", vec![1.0]), ("b", vec![2.0])])).unwrap_err();
        assert_eq!(err.error_code(), "STATISTICAL_TEST_FAILED");
    }
}
