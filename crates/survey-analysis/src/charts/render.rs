//! Text rendering of charts for the terminal.

use super::{BoxPlotChart, Chart, StackedBarChart};
use std::fmt::Write;

const GLYPHS: [char; 8] = ['█', '▓', '▒', '░', '#', '=', '+', '*'];

/// Draw `chart` as text, bars and boxes spanning at most `width` cells.
pub fn render(chart: &Chart, width: usize) -> String {
    let width = width.max(10);
    match chart {
        Chart::StackedBar(chart) => render_stacked_bar(chart, width),
        Chart::BoxPlot(chart) => render_box_plot(chart, width),
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

fn render_stacked_bar(chart: &StackedBarChart, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart.title);
    let _ = writeln!(out, "{} / {}", chart.x_label, chart.y_label);

    let totals = chart.totals();
    let max_total = totals.iter().copied().max().unwrap_or(0).max(1);
    let pad = label_width(chart.categories.iter().map(String::as_str));

    for (i, category) in chart.categories.iter().enumerate() {
        let mut bar = String::new();
        for (s, series) in chart.series.iter().enumerate() {
            let cells = series.values[i] * width / max_total;
            let glyph = GLYPHS[s % GLYPHS.len()];
            bar.extend(std::iter::repeat_n(glyph, cells));
        }
        let _ = writeln!(out, "{:>pad$} | {} {}", category, bar, totals[i], pad = pad);
    }

    let _ = writeln!(out, "{}:", chart.legend_title);
    for (s, series) in chart.series.iter().enumerate() {
        let _ = writeln!(out, "  {} {}", GLYPHS[s % GLYPHS.len()], series.name);
    }
    out
}

fn render_box_plot(chart: &BoxPlotChart, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart.title);
    let _ = writeln!(out, "{} / {}", chart.x_label, chart.y_label);

    let Some((lo, hi)) = chart.value_range() else {
        return out;
    };
    let span = if hi > lo { hi - lo } else { 1.0 };
    let position = |v: f64| (((v - lo) / span) * (width - 1) as f64).round() as usize;
    let pad = label_width(chart.groups.iter().map(|g| g.label.as_str()));

    for group in &chart.groups {
        let mut line = vec![' '; width];
        for cell in &mut line[position(group.min_whisker)..=position(group.max_whisker)] {
            *cell = '-';
        }
        for cell in &mut line[position(group.q1)..=position(group.q3)] {
            *cell = '=';
        }
        line[position(group.min_whisker)] = '|';
        line[position(group.max_whisker)] = '|';
        line[position(group.median)] = 'M';
        for &outlier in &group.outliers {
            line[position(outlier)] = 'o';
        }

        let line: String = line.into_iter().collect();
        let _ = writeln!(
            out,
            "{:>pad$} | {} (mediana {:.1})",
            group.label,
            line.trim_end(),
            group.median,
            pad = pad
        );
    }
    let _ = writeln!(out, "{:>pad$}   {:<.1}{:>w$.1}", "", lo, hi, pad = pad, w = width.saturating_sub(6));
    out
}
