//! Bar chart aggregation.
//!
//! For a selected scale, each scenario's matching entries are combined into
//! one row per metric: values add up, and errors, being independent
//! measurement uncertainties, add in quadrature (`sqrt(sum(err^2))`).

use std::collections::BTreeSet;

use qrd_core::{ChartInfo, ChartSeries};
use serde::Serialize;

/// One bar: a scenario's aggregated value and error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub scenario: String,
    pub value: f64,
    pub error: f64,
}

/// Aggregate `metric` at `scale` for every scenario, in declaration order.
///
/// Scenarios without a matching entry still get a row, valued zero, so all
/// charts share the same scenario axis.
pub fn aggregate(series: &ChartSeries, metric: &str, scale: &str) -> Vec<SeriesRow> {
    series
        .iter()
        .map(|(scenario, entries)| {
            let (value, squared_error) = entries
                .iter()
                .filter(|entry| entry.matches_scale(scale))
                .fold((0.0, 0.0), |(value, squared), entry| {
                    let error = entry.error(metric);
                    (value + entry.value(metric), squared + error * error)
                });
            SeriesRow {
                scenario: scenario.to_string(),
                value,
                error: squared_error.sqrt(),
            }
        })
        .collect()
}

/// Distinct scales of the reference (first) scenario, sorted as strings.
///
/// Scales that appear only in later scenarios are not offered.
pub fn selectable_scales(series: &ChartSeries) -> Vec<String> {
    let Some((_, entries)) = series.reference_scenario() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| entry.scale.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Everything needed to draw one metric's bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub metric: String,
    pub label: String,
    pub unit: String,
    /// Y axis title, `"<label> (<unit>)"`.
    pub axis_title: String,
    pub rows: Vec<SeriesRow>,
}

/// One panel per registered metric, in registry order.
pub fn chart_panels(info: &ChartInfo, series: &ChartSeries, scale: &str) -> Vec<ChartPanel> {
    info.metrics()
        .map(|metric| {
            let label = info.label(metric).to_string();
            let unit = info.unit(metric).to_string();
            ChartPanel {
                metric: metric.to_string(),
                axis_title: format!("{} ({})", label, unit),
                label,
                unit,
                rows: aggregate(series, metric, scale),
            }
        })
        .collect()
}
