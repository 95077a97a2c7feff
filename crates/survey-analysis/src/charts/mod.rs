//! Chart models for the three analyses.
//!
//! Charts are plain serializable data. [`render`] draws them as text for
//! the terminal and [`export_json`] writes them for an external plotter.

mod render;

pub use render::render;

use crate::analysis::{ContingencyTable, GroupedValues};
use crate::error::{Result, ResultExt};
use crate::utils::{quantile_sorted, sort_floats};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whisker reach in multiples of the IQR.
const WHISKER_REACH: f64 = 1.5;

/// Any chart produced by the analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    StackedBar(StackedBarChart),
    BoxPlot(BoxPlotChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::StackedBar(chart) => &chart.title,
            Chart::BoxPlot(chart) => &chart.title,
        }
    }
}

/// Axis and title text shared by every chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartLabels<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Legend heading; stacked bars fall back to the column variable.
    pub legend: Option<&'a str>,
}

/// One stacked layer of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    /// One value per category, aligned with [`StackedBarChart::categories`].
    pub values: Vec<usize>,
}

/// Bars per category, each split into one segment per series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl StackedBarChart {
    /// One bar per row label of `table`, stacked by column label.
    pub fn from_table(table: &ContingencyTable, labels: ChartLabels<'_>) -> Self {
        let series = table
            .column_labels
            .iter()
            .enumerate()
            .map(|(j, name)| BarSeries {
                name: name.clone(),
                values: table.counts.iter().map(|row| row[j]).collect(),
            })
            .collect();

        Self {
            title: labels.title.to_string(),
            x_label: labels.x_label.to_string(),
            y_label: labels.y_label.to_string(),
            legend_title: labels
                .legend
                .unwrap_or(table.column_variable.as_str())
                .to_string(),
            categories: table.row_labels.clone(),
            series,
        }
    }

    /// Height of each bar.
    pub fn totals(&self) -> Vec<usize> {
        (0..self.categories.len())
            .map(|i| self.series.iter().map(|s| s.values[i]).sum())
            .collect()
    }
}

/// Five-number box of one group plus the points beyond the whiskers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    pub label: String,
    pub min_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxGroup {
    /// Summarize `values`; `None` when there are no values.
    pub fn from_values(label: &str, values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sort_floats(&mut sorted);
        let (&first, &last) = (sorted.first()?, sorted.last()?);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_REACH * iqr;
        let high_fence = q3 + WHISKER_REACH * iqr;

        // Whiskers end at the most extreme data point inside the fences
        let min_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(first);
        let max_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(last);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(Self {
            label: label.to_string(),
            min_whisker,
            q1,
            median,
            q3,
            max_whisker,
            outliers,
        })
    }
}

/// One box per group on a shared value axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<BoxGroup>,
}

impl BoxPlotChart {
    pub fn from_groups(data: &GroupedValues, labels: ChartLabels<'_>) -> Self {
        let groups = data
            .groups
            .iter()
            .filter_map(|(label, values)| BoxGroup::from_values(label, values))
            .collect();

        Self {
            title: labels.title.to_string(),
            x_label: labels.x_label.to_string(),
            y_label: labels.y_label.to_string(),
            groups,
        }
    }

    /// Smallest and largest value drawn, outliers included.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut points = self.groups.iter().flat_map(|g| {
            std::iter::once(g.min_whisker)
                .chain(std::iter::once(g.max_whisker))
                .chain(g.outliers.iter().copied())
        });
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Write `chart` as pretty JSON to `<dir>/<file_stem>.json`.
pub fn export_json(chart: &Chart, dir: &Path, file_stem: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).context(format!("Creating charts directory {}", dir.display()))?;

    let path = dir.join(format!("{}.json", file_stem));
    let json = serde_json::to_string_pretty(chart)?;
    fs::write(&path, json).context(format!("Writing chart {}", path.display()))?;

    debug!("Chart '{}' written to {}", chart.title(), path.display());
    Ok(path)
}
