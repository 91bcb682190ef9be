use indexmap::IndexMap;
use serde::Serialize;

use qrd_core::{LayerRegistry, PointRecord};

use crate::points::extract_points;
use crate::resolver::ResourceResolver;

/// A layer that could not be shown, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerWarning {
    pub layer: String,
    pub message: String,
}

/// Points per layer, plus warnings for the layers that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapLayers {
    pub layers: IndexMap<String, Vec<PointRecord>>,
    pub warnings: Vec<LayerWarning>,
}

/// Resolve and flatten every registered layer.
///
/// A layer that fails to resolve is logged, recorded as a warning and left
/// out; a layer without a single usable point is left out silently. The
/// remaining layers keep registry order.
pub fn load_map_layers(registry: &LayerRegistry, resolver: &ResourceResolver<'_>) -> MapLayers {
    let mut map = MapLayers::default();
    for (name, location) in registry.iter() {
        let collection = match resolver.resolve(location) {
            Ok(collection) => collection,
            Err(e) => {
                log::warn!("[QRD] layers: skipping layer '{}': {}", name, e);
                map.warnings.push(LayerWarning {
                    layer: name.to_string(),
                    message: e.to_string(),
                });
                continue;
            }
        };
        let points = extract_points(Some(&collection));
        log::info!(
            "[QRD] layers: layer '{}' has {} of {} features as points",
            name,
            points.len(),
            collection.len()
        );
        if !points.is_empty() {
            map.layers.insert(name.to_string(), points);
        }
    }
    map
}
