use qrd_core::{FeatureCollection, PointRecord};

/// Flatten a feature collection into map points.
///
/// Coordinates are read in GeoJSON order, `[lon, lat, ...]`. Features with
/// fewer than two numeric components are skipped; properties are copied
/// verbatim and input order is kept.
pub fn extract_points(collection: Option<&FeatureCollection>) -> Vec<PointRecord> {
    let Some(collection) = collection else {
        return Vec::new();
    };
    collection
        .features
        .iter()
        .filter_map(|feature| {
            let (lon, lat) = feature.geometry.as_ref()?.lon_lat()?;
            Some(PointRecord {
                lat,
                lon,
                properties: feature.properties.clone().unwrap_or_default(),
            })
        })
        .collect()
}
