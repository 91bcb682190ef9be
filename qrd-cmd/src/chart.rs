use std::io::Write;

use csv::Writer;
use serde::Serialize;

use qrd_data::{aggregate, ChartPanel, Dashboard};

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    metric: &'a str,
    scale: &'a str,
    scenario: &'a str,
    value: f64,
    error: f64,
}

fn panels_for(dashboard: &Dashboard, scale: &str, metric: Option<&str>) -> Vec<ChartPanel> {
    let panels = dashboard.chart_panels(scale);
    let Some(metric) = metric else {
        return panels;
    };
    if let Some(panel) = panels.iter().find(|panel| panel.metric == metric) {
        return vec![panel.clone()];
    }
    // Metrics missing from the registry still aggregate; they are just unlabelled.
    log::warn!("[QRD] chart: metric '{}' has no label or unit registered", metric);
    vec![ChartPanel {
        metric: metric.to_string(),
        label: metric.to_string(),
        unit: String::new(),
        axis_title: format!("{} ()", metric),
        rows: aggregate(dashboard.chart_data(), metric, scale),
    }]
}

pub fn write_csv(panels: &[ChartPanel], scale: &str, path: &str) -> anyhow::Result<()> {
    let mut writer = Writer::from_path(path)?;
    for panel in panels {
        for row in &panel.rows {
            writer.serialize(CsvRow {
                metric: &panel.metric,
                scale,
                scenario: &row.scenario,
                value: row.value,
                error: row.error,
            })?;
        }
    }
    writer.flush()?;
    log::info!("[QRD] chart: wrote {} panels to {}", panels.len(), path);
    Ok(())
}

/// Aggregate the chart panels for `scale` and print them.
pub fn run_chart(
    dashboard: &Dashboard,
    scale: Option<String>,
    metric: Option<String>,
    csv_path: Option<&str>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let Some(scale) = scale.or_else(|| dashboard.selectable_scales().into_iter().next()) else {
        log::warn!("[QRD] chart: no chart data found");
        return crate::write_json(out, &Vec::<ChartPanel>::new());
    };
    let panels = panels_for(dashboard, &scale, metric.as_deref());
    if let Some(path) = csv_path {
        write_csv(&panels, &scale, path)?;
    }
    crate::write_json(out, &panels)
}
