//! The dashboard's data surface.
//!
//! A [`Dashboard`] owns one loaded configuration document and answers the
//! rendering layer's four retrieval calls from it. Nothing is cached between
//! calls beyond the document itself; build a new `Dashboard` to pick up
//! edits to the configuration.

use qrd_core::{ChartSeries, ConfigurationDocument, DisplayText, ProjectRoot, StyleDocument};

use crate::chart::{self, ChartPanel};
use crate::layers::{load_map_layers, MapLayers};
use crate::resolver::{RemoteStore, ResourceResolver, SqliteRemote};
use crate::secrets::{SecretChain, SecretProvider};

pub struct Dashboard {
    root: ProjectRoot,
    document: ConfigurationDocument,
    secrets: Box<dyn SecretProvider>,
    remote: Option<Box<dyn RemoteStore>>,
}

impl Dashboard {
    /// Read the project's configuration and wire up the default secret
    /// chain and, when configured, the SQLite table store.
    pub fn load(root: ProjectRoot) -> Self {
        let document = ConfigurationDocument::load(&root);
        Self::new(root, document)
    }

    pub fn new(root: ProjectRoot, document: ConfigurationDocument) -> Self {
        let secrets = Box::new(SecretChain::for_project(&root));
        let remote = document
            .remote_store
            .as_ref()
            .map(|settings| Box::new(SqliteRemote::from_settings(&root, settings)) as Box<dyn RemoteStore>);
        Self {
            root,
            document,
            secrets,
            remote,
        }
    }

    pub fn with_secrets(mut self, secrets: impl SecretProvider + 'static) -> Self {
        self.secrets = Box::new(secrets);
        self
    }

    pub fn with_remote(mut self, remote: impl RemoteStore + 'static) -> Self {
        self.remote = Some(Box::new(remote));
        self
    }

    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }

    pub fn document(&self) -> &ConfigurationDocument {
        &self.document
    }

    pub fn display_text(&self) -> DisplayText {
        self.document.display_text()
    }

    pub fn chart_data(&self) -> &ChartSeries {
        &self.document.chart_data
    }

    pub fn selectable_scales(&self) -> Vec<String> {
        chart::selectable_scales(&self.document.chart_data)
    }

    pub fn chart_panels(&self, scale: &str) -> Vec<ChartPanel> {
        chart::chart_panels(&self.document.chart_info, &self.document.chart_data, scale)
    }

    pub fn resolver(&self) -> ResourceResolver<'_> {
        let resolver = ResourceResolver::new(&self.root, self.secrets.as_ref());
        match &self.remote {
            Some(remote) => resolver.with_remote(remote.as_ref()),
            None => resolver,
        }
    }

    /// Points for every layer that resolved, with warnings for the rest.
    pub fn map_layers(&self) -> MapLayers {
        load_map_layers(&self.document.gis_layers, &self.resolver())
    }

    pub fn map_styles(&self) -> StyleDocument {
        StyleDocument::load(&self.root, &self.document.gis_layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn write_project(dir: &std::path::Path) {
        std::fs::write(
            dir.join("DashboardInput.yaml"),
            r#"
dashboard_content:
  title: Test dashboard
bar_chart_info:
  labels: { qubits: Qubits }
bar_chart_data:
  A:
    - { scale: S, qubits: 10, qubitsErr: 3 }
    - { scale: S, qubits: 5, qubitsErr: 4 }
gis_layers:
  style: map_style.yaml
  Hubs: hubs.geojson
  Centers: remote://centers
"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("map_style.yaml"),
            "defaults: { color: blue }\nlayers:\n  Hubs: { color: purple }\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("hubs.geojson"),
            r#"{"features": [{"geometry": {"coordinates": [1, 2]}, "properties": {"name": "H"}}]}"#,
        )
        .unwrap();
    }

    #[test]
    fn answers_all_four_retrieval_calls() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path());
        let dashboard = Dashboard::load(ProjectRoot::new(dir.path()))
            .with_secrets(HashMap::<String, String>::new());

        assert_eq!(dashboard.display_text().content["title"], "Test dashboard");
        assert_eq!(dashboard.chart_data().entries("A").len(), 2);
        assert_eq!(dashboard.selectable_scales(), vec!["S"]);

        let panels = dashboard.chart_panels("S");
        assert_eq!(panels[0].rows[0].value, 15.0);
        assert_eq!(panels[0].rows[0].error, 5.0);

        let map = dashboard.map_layers();
        assert_eq!(map.layers.len(), 1);
        assert!(map.layers.contains_key("Hubs"));
        assert_eq!(map.warnings.len(), 1);

        let styles = dashboard.map_styles();
        assert_eq!(styles.resolve("Hubs").color, "purple");
        assert_eq!(styles.resolve("Centers").color, "blue");
    }

    #[test]
    fn empty_project_degrades_to_empty_views() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = Dashboard::load(ProjectRoot::new(dir.path()));

        assert!(dashboard.display_text().content.is_empty());
        assert!(dashboard.chart_data().is_empty());
        assert!(dashboard.selectable_scales().is_empty());
        assert!(dashboard.chart_panels("S").is_empty());
        assert_eq!(dashboard.map_layers(), MapLayers::default());
        assert_eq!(dashboard.map_styles(), StyleDocument::default());
    }
}
