//! The dashboard configuration document (`DashboardInput.yaml`).
//!
//! The document is a plain value: callers load it once per render pass and
//! pass it to whatever needs it. Every top-level section is decoded on its
//! own, so one malformed section only empties itself.
//!
//! ```yaml
//! dashboard_content:
//!   title: Quantum Resource Dashboard
//! bar_chart_info:
//!   labels: { qubits: Physical qubits }
//!   units: { qubits: count }
//! bar_chart_data:
//!   baseline:
//!     - { scale: "S", qubits: 10, qubitsErr: 3 }
//! gis_layers:
//!   style: map_style.yaml
//!   Quantum hubs: data_map/quantum_hubs.geojson
//!   Data centers: remote://data_centers
//! remote_store:
//!   database: store.sqlite
//! ```

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::project::ProjectRoot;
use crate::series::ChartSeries;

pub const CONTENT_SECTION: &str = "dashboard_content";
pub const CHART_INFO_SECTION: &str = "bar_chart_info";
pub const CHART_DATA_SECTION: &str = "bar_chart_data";
pub const LAYERS_SECTION: &str = "gis_layers";
pub const REMOTE_STORE_SECTION: &str = "remote_store";

/// Registry key that names the style document instead of a layer.
pub const STYLE_KEY: &str = "style";

const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;

/// Render a YAML scalar as display text. Collections and nulls yield `None`.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decode a `name → text` mapping, keeping only scalar values.
fn string_map(value: Option<&Value>) -> IndexMap<String, String> {
    let Some(mapping) = value.and_then(Value::as_mapping) else {
        return IndexMap::new();
    };
    mapping
        .iter()
        .filter_map(|(key, value)| Some((scalar_to_string(key)?, scalar_to_string(value)?)))
        .collect()
}

/// Metric registry: display label and unit per metric id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartInfo {
    pub labels: IndexMap<String, String>,
    pub units: IndexMap<String, String>,
}

impl ChartInfo {
    fn from_value(value: Option<&Value>) -> Self {
        Self {
            labels: string_map(value.and_then(|v| v.get("labels"))),
            units: string_map(value.and_then(|v| v.get("units"))),
        }
    }

    /// Metric ids in the order the registry declares them.
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    /// Display label, falling back to the metric id itself.
    pub fn label<'a>(&'a self, metric: &'a str) -> &'a str {
        self.labels.get(metric).map(String::as_str).unwrap_or(metric)
    }

    /// Unit string, empty when the registry has none.
    pub fn unit(&self, metric: &str) -> &str {
        self.units.get(metric).map(String::as_str).unwrap_or("")
    }
}

/// Text shown around the charts and the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayText {
    pub content: IndexMap<String, String>,
    pub bar_chart_info: ChartInfo,
}

/// Layer name → resource location, plus the style document pointer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerRegistry {
    layers: IndexMap<String, String>,
    style: Option<String>,
}

impl LayerRegistry {
    fn from_value(value: Option<&Value>) -> Self {
        let mut registry = Self::default();
        let Some(mapping) = value.and_then(Value::as_mapping) else {
            return registry;
        };
        for (name, location) in mapping {
            let Some(name) = scalar_to_string(name) else { continue };
            let Some(location) = location.as_str() else {
                log::warn!("[QRD] config: layer '{}' has no location string, skipping", name);
                continue;
            };
            if name.eq_ignore_ascii_case(STYLE_KEY) {
                registry.style = Some(location.to_string());
            } else {
                registry.layers.insert(name, location.to_string());
            }
        }
        registry
    }

    pub fn insert(&mut self, name: impl Into<String>, location: impl Into<String>) {
        self.layers.insert(name.into(), location.into());
    }

    pub fn set_style_path(&mut self, path: impl Into<String>) {
        self.style = Some(path.into());
    }

    /// Path of the style document, if the registry names one.
    pub fn style_path(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// `(layer name, location)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.layers
            .iter()
            .map(|(name, location)| (name.as_str(), location.as_str()))
    }

    pub fn location(&self, name: &str) -> Option<&str> {
        self.layers.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Where `remote://` layers are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteStoreSettings {
    /// Store database path, resolved against the project root.
    pub database: String,
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

fn default_store_timeout() -> u64 {
    DEFAULT_STORE_TIMEOUT_SECS
}

/// The one section decoded from source text rather than from a
/// [`Value`], so scale labels keep their spelling.
#[derive(Deserialize)]
struct ChartDataSection {
    #[serde(default, rename = "bar_chart_data")]
    chart_data: Option<ChartSeries>,
}

fn chart_data(text: &str, value: &Value) -> ChartSeries {
    match value.get(CHART_DATA_SECTION) {
        None | Some(Value::Null) => return ChartSeries::default(),
        Some(section) if !section.is_mapping() => {
            log::warn!("[QRD] config: {} is not a mapping, ignoring it", CHART_DATA_SECTION);
            return ChartSeries::default();
        }
        Some(_) => {}
    }
    match serde_yaml::from_str::<ChartDataSection>(text) {
        Ok(section) => section.chart_data.unwrap_or_default(),
        Err(e) => {
            log::warn!("[QRD] config: ignoring malformed {} section: {}", CHART_DATA_SECTION, e);
            ChartSeries::default()
        }
    }
}

/// The parsed `DashboardInput.yaml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationDocument {
    pub content: IndexMap<String, String>,
    pub chart_info: ChartInfo,
    pub chart_data: ChartSeries,
    pub gis_layers: LayerRegistry,
    pub remote_store: Option<RemoteStoreSettings>,
}

impl ConfigurationDocument {
    /// Load the project's configuration, falling back to an empty document.
    ///
    /// A missing or unparsable file is logged and treated as "nothing to
    /// show"; it never fails the render pass.
    pub fn load(root: &ProjectRoot) -> Self {
        match Self::try_load(root) {
            Ok(document) => document,
            Err(e) => {
                log::warn!("[QRD] config: using an empty configuration: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load the project's configuration, reporting why it could not be read.
    pub fn try_load(root: &ProjectRoot) -> anyhow::Result<Self> {
        let path = root.config_path();
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse configuration text. An empty document is valid.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(text)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        if !value.is_mapping() {
            anyhow::bail!("configuration root must be a mapping");
        }

        let remote_store = match value.get(REMOTE_STORE_SECTION) {
            None | Some(Value::Null) => None,
            Some(section) => match serde_yaml::from_value(section.clone()) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    log::warn!("[QRD] config: ignoring malformed {} section: {}", REMOTE_STORE_SECTION, e);
                    None
                }
            },
        };

        let document = Self {
            content: string_map(value.get(CONTENT_SECTION)),
            chart_info: ChartInfo::from_value(value.get(CHART_INFO_SECTION)),
            chart_data: chart_data(text, &value),
            gis_layers: LayerRegistry::from_value(value.get(LAYERS_SECTION)),
            remote_store,
        };
        log::info!(
            "[QRD] config: loaded {} scenarios, {} metrics, {} layers",
            document.chart_data.len(),
            document.chart_info.labels.len(),
            document.gis_layers.len()
        );
        Ok(document)
    }

    /// Display text view: content fields plus the metric registry.
    pub fn display_text(&self) -> DisplayText {
        DisplayText {
            content: self.content.clone(),
            bar_chart_info: self.chart_info.clone(),
        }
    }
}
