//! Column-level value replacement used by the cleaning stage.

use crate::error::Result;
use crate::utils::series;
use polars::prelude::*;
use tracing::debug;

/// Replace every null of a string column with `fill_value`.
///
/// Returns the number of values filled. Non-null values are left untouched.
pub(crate) fn fill_string_nulls(df: &mut DataFrame, column: &str, fill_value: &str) -> Result<usize> {
    let original = series(df, column)?;
    let missing = original.null_count();
    if missing == 0 {
        return Ok(0);
    }

    let as_str = original.cast(&DataType::String)?;
    let filled: StringChunked = as_str
        .str()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();
    let filled = filled.with_name(original.name().clone()).into_series();

    df.replace(column, filled)?;
    debug!("Filled {} nulls in '{}' with '{}'", missing, column, fill_value);
    Ok(missing)
}

/// Rename every cell equal to `from` in a string column to `to`.
///
/// Returns the number of cells renamed. Nulls and other labels are kept.
pub(crate) fn replace_label(df: &mut DataFrame, column: &str, from: &str, to: &str) -> Result<usize> {
    let original = series(df, column)?;
    let as_str = original.cast(&DataType::String)?;
    let values = as_str.str()?;

    let renamed = values.into_iter().filter(|v| *v == Some(from)).count();
    if renamed == 0 {
        return Ok(0);
    }

    let replaced: StringChunked = values
        .into_iter()
        .map(|v| v.map(|label| if label == from { to } else { label }))
        .collect();
    let replaced = replaced.with_name(original.name().clone()).into_series();

    df.replace(column, replaced)?;
    debug!("Renamed {} '{}' labels to '{}' in '{}'", renamed, from, to, column);
    Ok(renamed)
}

/// Number of cells of a column equal to `label`.
pub(crate) fn count_label(df: &DataFrame, column: &str, label: &str) -> Result<usize> {
    let as_str = series(df, column)?.cast(&DataType::String)?;
    Ok(as_str
        .str()?
        .into_iter()
        .filter(|v| *v == Some(label))
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_string_nulls() {
        let mut df = df!["activity" => [Some("Daily"), None, Some("Weekly"), None]].unwrap();

        let filled = fill_string_nulls(&mut df, "activity", "Inactive").unwrap();
        assert_eq!(filled, 2);

        let col = df.column("activity").unwrap();
        assert_eq!(col.null_count(), 0);
        let values: Vec<Option<&str>> = col.str().unwrap().into_iter().collect();
        assert_eq!(
            values,
            vec![Some("Daily"), Some("Inactive"), Some("Weekly"), Some("Inactive")]
        );
    }

    #[test]
    fn test_fill_string_nulls_without_nulls_is_noop() {
        let mut df = df!["activity" => ["Daily", "Weekly"]].unwrap();
        let before = df.clone();

        assert_eq!(fill_string_nulls(&mut df, "activity", "Inactive").unwrap(), 0);
        assert!(df.equals_missing(&before));
    }

    #[test]
    fn test_replace_label_only_touches_exact_matches() {
        let mut df = df![
            "location" => [Some("Onsite"), Some("Remote"), None, Some("Hybrid"), Some("Onsite ")],
        ]
        .unwrap();

        let renamed = replace_label(&mut df, "location", "Onsite", "Office").unwrap();
        assert_eq!(renamed, 1);

        let values: Vec<Option<&str>> = df
            .column("location")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            values,
            vec![
                Some("Office"),
                Some("Remote"),
                None,
                Some("Hybrid"),
                Some("Onsite ")
            ]
        );
    }

    #[test]
    fn test_count_label() {
        let df = df!["condition" => [Some("No Issues"), Some("Anxiety"), Some("No Issues"), None]]
            .unwrap();
        assert_eq!(count_label(&df, "condition", "No Issues").unwrap(), 2);
        assert_eq!(count_label(&df, "condition", "Burnout").unwrap(), 0);
    }
}
