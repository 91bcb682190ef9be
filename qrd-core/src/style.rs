//! Map layer styling: a defaults block plus per-layer partial overrides.
//!
//! ```yaml
//! defaults: { color: blue, size: 10, opacity: 0.8 }
//! layers:
//!   Quantum hubs: { color: purple }
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

use crate::document::{scalar_to_string, LayerRegistry};
use crate::project::ProjectRoot;

pub const FALLBACK_COLOR: &str = "red";
pub const FALLBACK_SIZE: f64 = 8.0;
pub const FALLBACK_OPACITY: f64 = 0.7;

const DEFAULTS_SECTION: &str = "defaults";
const LAYERS_SECTION: &str = "layers";
const COLOR_KEY: &str = "color";
const SIZE_KEY: &str = "size";
const OPACITY_KEY: &str = "opacity";

/// Any subset of the three style fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartialStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// A fully populated marker style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerStyle {
    pub color: String,
    pub size: f64,
    pub opacity: f64,
}

/// The style document named by the layer registry's `style` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleDocument {
    pub defaults: Option<PartialStyle>,
    pub layers: IndexMap<String, PartialStyle>,
}

impl PartialStyle {
    /// Decode one style block field by field. A field of the wrong type is
    /// warned about and left unset; the other fields still apply.
    fn from_value(owner: &str, value: &Value) -> Option<Self> {
        let Some(mapping) = value.as_mapping() else {
            if !value.is_null() {
                log::warn!("[QRD] style: '{}' is not a mapping, ignoring it", owner);
            }
            return None;
        };
        let mut style = Self::default();
        for (key, field) in mapping {
            let Some(key) = key.as_str() else { continue };
            if field.is_null() {
                continue;
            }
            let accepted = match key {
                COLOR_KEY => {
                    style.color = field.as_str().map(String::from);
                    style.color.is_some()
                }
                SIZE_KEY => {
                    style.size = field.as_f64();
                    style.size.is_some()
                }
                OPACITY_KEY => {
                    style.opacity = field.as_f64();
                    style.opacity.is_some()
                }
                _ => true,
            };
            if !accepted {
                log::warn!("[QRD] style: ignoring malformed '{}' of '{}'", key, owner);
            }
        }
        Some(style)
    }
}

impl StyleDocument {
    /// Parse a style document. The `defaults` block and every layer override
    /// are decoded on their own, so one bad entry only loses itself.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(text)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        if !value.is_mapping() {
            anyhow::bail!("style document root must be a mapping");
        }

        let defaults = value
            .get(DEFAULTS_SECTION)
            .and_then(|block| PartialStyle::from_value(DEFAULTS_SECTION, block));
        let mut layers = IndexMap::new();
        match value.get(LAYERS_SECTION) {
            None | Some(Value::Null) => {}
            Some(Value::Mapping(entries)) => {
                for (name, block) in entries {
                    let Some(name) = scalar_to_string(name) else { continue };
                    if let Some(style) = PartialStyle::from_value(&name, block) {
                        layers.insert(name, style);
                    }
                }
            }
            Some(_) => log::warn!("[QRD] style: {} is not a mapping, ignoring it", LAYERS_SECTION),
        }
        Ok(Self { defaults, layers })
    }

    /// Load the style document the registry points at.
    ///
    /// No `style` key, a missing file, or a malformed file all produce an
    /// empty document, so every layer falls through to the hard fallback.
    pub fn load(root: &ProjectRoot, registry: &LayerRegistry) -> Self {
        let Some(style_path) = registry.style_path() else {
            log::warn!("[QRD] style: no style document configured, using fallback styles");
            return Self::default();
        };
        let path = root.resolve(style_path);
        let loaded = std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|text| Self::parse(&text));
        match loaded {
            Ok(document) => document,
            Err(e) => {
                log::warn!(
                    "[QRD] style: could not load {}, using fallback styles: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Resolve a layer's style field by field: override, then default,
    /// then the hard fallback.
    pub fn resolve(&self, layer: &str) -> LayerStyle {
        let empty = PartialStyle::default();
        let overrides = self.layers.get(layer).unwrap_or(&empty);
        let defaults = self.defaults.as_ref().unwrap_or(&empty);

        LayerStyle {
            color: overrides
                .color
                .clone()
                .or_else(|| defaults.color.clone())
                .unwrap_or_else(|| FALLBACK_COLOR.to_string()),
            size: overrides.size.or(defaults.size).unwrap_or(FALLBACK_SIZE),
            opacity: overrides
                .opacity
                .or(defaults.opacity)
                .unwrap_or(FALLBACK_OPACITY),
        }
    }
}
