//! The render pass: one user selection in, everything the page draws out.

use serde::Serialize;

use qrd_core::{LayerStyle, PointRecord};

use crate::chart::ChartPanel;
use crate::dashboard::Dashboard;

pub const DEFAULT_TITLE: &str = "Quantum Resource Dashboard";

const TITLE_KEY: &str = "title";
const INTRO_KEY: &str = "intro_markdown";
const MAP_KEY: &str = "map_markdown";
const HOVER_PROPERTY: &str = "name";

/// The user's controls. `None` means "use the default".
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Scale to chart; defaults to the first selectable scale.
    pub scale: Option<String>,
    /// Layers to draw; defaults to every loaded layer.
    pub layers: Option<Vec<String>>,
}

/// One map layer ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapTrace {
    pub name: String,
    pub style: LayerStyle,
    pub points: Vec<PointRecord>,
    /// Marker labels: each point's `name` property, else the layer name.
    pub hover_text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPass {
    pub title: String,
    pub intro_markdown: Option<String>,
    pub map_markdown: Option<String>,
    pub scales: Vec<String>,
    pub selected_scale: Option<String>,
    pub available_layers: Vec<String>,
    pub charts: Vec<ChartPanel>,
    pub map: Vec<MapTrace>,
    /// Advisory messages for a warning banner.
    pub warnings: Vec<String>,
}

fn hover_text(layer: &str, point: &PointRecord) -> String {
    match point.property(HOVER_PROPERTY) {
        Some(serde_json::Value::String(name)) => name.clone(),
        Some(value) if !value.is_null() => value.to_string(),
        _ => layer.to_string(),
    }
}

impl Dashboard {
    pub fn render_pass(&self, selection: &Selection) -> RenderPass {
        let content = &self.document().content;
        let mut warnings = Vec::new();

        let scales = self.selectable_scales();
        let selected_scale = selection
            .scale
            .clone()
            .or_else(|| scales.first().cloned());
        if self.chart_data().is_empty() {
            warnings.push("No chart data found.".to_string());
        }
        let charts = selected_scale
            .as_deref()
            .map(|scale| self.chart_panels(scale))
            .unwrap_or_default();

        let mut map_layers = self.map_layers();
        warnings.extend(
            map_layers
                .warnings
                .iter()
                .map(|w| format!("Layer '{}' is unavailable: {}", w.layer, w.message)),
        );
        let available_layers: Vec<String> = map_layers.layers.keys().cloned().collect();
        let selected_layers = selection
            .layers
            .clone()
            .unwrap_or_else(|| available_layers.clone());

        let styles = self.map_styles();
        let map: Vec<MapTrace> = selected_layers
            .iter()
            .filter_map(|name| {
                let points = map_layers.layers.swap_remove(name)?;
                Some(MapTrace {
                    name: name.clone(),
                    style: styles.resolve(name),
                    hover_text: points.iter().map(|p| hover_text(name, p)).collect(),
                    points,
                })
            })
            .collect();
        if map.is_empty() {
            warnings.push("No layer data selected or available.".to_string());
        }

        RenderPass {
            title: content
                .get(TITLE_KEY)
                .cloned()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            intro_markdown: content.get(INTRO_KEY).cloned(),
            map_markdown: content.get(MAP_KEY).cloned(),
            scales,
            selected_scale,
            available_layers,
            charts,
            map,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrd_core::{ConfigurationDocument, ProjectRoot};
    use std::collections::HashMap;

    fn dashboard(dir: &std::path::Path) -> Dashboard {
        std::fs::write(
            dir.join("hubs.geojson"),
            r#"{"features": [
                {"geometry": {"coordinates": [1, 2]}, "properties": {"name": "Hub A"}},
                {"geometry": {"coordinates": [3, 4]}, "properties": {"id": 9}}
            ]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("labs.geojson"),
            r#"{"features": [{"geometry": {"coordinates": [5, 6]}, "properties": {"name": 42}}]}"#,
        )
        .unwrap();
        let document = ConfigurationDocument::parse(
            r#"
dashboard_content:
  intro_markdown: Intro
bar_chart_info:
  labels: { qubits: Qubits }
  units: { qubits: count }
bar_chart_data:
  A:
    - { scale: "L", qubits: 1 }
    - { scale: "S", qubits: 2 }
  B:
    - { scale: "S", qubits: 3 }
gis_layers:
  Hubs: hubs.geojson
  Labs: labs.geojson
  Centers: remote://centers
"#,
        )
        .unwrap();
        Dashboard::new(ProjectRoot::new(dir), document).with_secrets(HashMap::<String, String>::new())
    }

    #[test]
    fn defaults_select_first_scale_and_all_layers() {
        let dir = tempfile::tempdir().unwrap();
        let pass = dashboard(dir.path()).render_pass(&Selection::default());

        assert_eq!(pass.title, DEFAULT_TITLE);
        assert_eq!(pass.intro_markdown.as_deref(), Some("Intro"));
        assert_eq!(pass.map_markdown, None);
        assert_eq!(pass.scales, vec!["L", "S"]);
        assert_eq!(pass.selected_scale.as_deref(), Some("L"));
        assert_eq!(pass.charts.len(), 1);
        assert_eq!(pass.charts[0].rows[0].value, 1.0);
        assert_eq!(pass.charts[0].rows[1].value, 0.0);
        assert_eq!(pass.available_layers, vec!["Hubs", "Labs"]);
        assert_eq!(pass.map.len(), 2);
        assert_eq!(pass.map[0].hover_text, vec!["Hub A", "Hubs"]);
        assert_eq!(pass.map[1].hover_text, vec!["42"]);
        assert_eq!(pass.map[0].style.color, "red");
        assert_eq!(pass.warnings.len(), 1);
        assert!(pass.warnings[0].contains("Centers"));
    }

    #[test]
    fn explicit_selection_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let selection = Selection {
            scale: Some("S".into()),
            layers: Some(vec!["Labs".into(), "Centers".into(), "Unknown".into()]),
        };
        let pass = dashboard(dir.path()).render_pass(&selection);

        let values: Vec<f64> = pass.charts[0].rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![2.0, 3.0]);
        assert_eq!(pass.map.len(), 1);
        assert_eq!(pass.map[0].name, "Labs");
    }

    #[test]
    fn empty_configuration_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let pass = Dashboard::new(ProjectRoot::new(dir.path()), ConfigurationDocument::default())
            .render_pass(&Selection::default());
        assert_eq!(pass.title, DEFAULT_TITLE);
        assert!(pass.scales.is_empty());
        assert!(pass.selected_scale.is_none());
        assert!(pass.charts.is_empty());
        assert!(pass.map.is_empty());
        assert_eq!(
            pass.warnings,
            vec!["No chart data found.", "No layer data selected or available."]
        );
    }
}
