use std::io::Write;

use serde::Serialize;

use qrd_core::{ConfigurationDocument, ProjectRoot};
use qrd_data::{Dashboard, LayerWarning};

#[derive(Debug, Serialize)]
struct CheckReport {
    config: String,
    scenarios: usize,
    metrics: usize,
    scales: Vec<String>,
    layers: usize,
    style: Option<String>,
    loaded_layers: Vec<LayerSummary>,
    warnings: Vec<LayerWarning>,
}

#[derive(Debug, Serialize)]
struct LayerSummary {
    name: String,
    points: usize,
}

/// Strictly load the configuration, then try every layer.
///
/// Unlike the other commands this fails when the configuration document is
/// missing or malformed, so it can gate a deploy.
pub fn run_check(root: &ProjectRoot, out: &mut dyn Write) -> anyhow::Result<()> {
    let document = ConfigurationDocument::try_load(root)?;
    let dashboard = Dashboard::new(root.clone(), document);
    let document = dashboard.document();
    let map = dashboard.map_layers();

    let report = CheckReport {
        config: root.config_path().display().to_string(),
        scenarios: document.chart_data.len(),
        metrics: document.chart_info.metrics().count(),
        scales: dashboard.selectable_scales(),
        layers: document.gis_layers.len(),
        style: document.gis_layers.style_path().map(String::from),
        loaded_layers: map
            .layers
            .iter()
            .map(|(name, points)| LayerSummary {
                name: name.clone(),
                points: points.len(),
            })
            .collect(),
        warnings: map.warnings,
    };
    log::info!(
        "[QRD] check: {} of {} layers loaded",
        report.loaded_layers.len(),
        report.layers
    );
    crate::write_json(out, &report)
}
