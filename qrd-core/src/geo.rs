//! GeoJSON shapes read from layer files and table stores, and the flat
//! point records the map draws.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

const FEATURE_COLLECTION: &str = "FeatureCollection";
const FEATURE: &str = "Feature";
const POINT: &str = "Point";

fn feature_collection_kind() -> String {
    FEATURE_COLLECTION.to_string()
}

fn feature_kind() -> String {
    FEATURE.to_string()
}

/// A GeoJSON feature collection.
///
/// Parsing is lenient about content (null features, null geometries, odd
/// coordinates) so that one bad feature never invalidates the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "feature_collection_kind")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Vec<Feature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self {
            kind: feature_collection_kind(),
            features: Vec::new(),
        }
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }

    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Feature>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Feature>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_kind")]
    pub kind: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    /// A point feature. Missing coordinates are kept as JSON nulls.
    pub fn point(lon: Option<f64>, lat: Option<f64>, properties: Map<String, Value>) -> Self {
        Self {
            kind: feature_kind(),
            geometry: Some(Geometry {
                kind: POINT.to_string(),
                coordinates: Value::Array(vec![number_or_null(lon), number_or_null(lat)]),
            }),
            properties: Some(properties),
        }
    }
}

fn number_or_null(n: Option<f64>) -> Value {
    n.and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Geometry with its coordinates left untyped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl Geometry {
    /// The first position as `(lon, lat)`, GeoJSON axis order.
    ///
    /// `None` unless the coordinates hold at least two numeric components.
    pub fn lon_lat(&self) -> Option<(f64, f64)> {
        let coordinates = self.coordinates.as_array()?;
        if coordinates.len() < 2 {
            return None;
        }
        Some((coordinates[0].as_f64()?, coordinates[1].as_f64()?))
    }
}

/// One map marker: typed coordinates plus whatever the source carried.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub lat: f64,
    pub lon: f64,
    pub properties: Map<String, Value>,
}

impl PointRecord {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Serializes flat: `lat`, `lon`, then the properties. Properties named
/// `lat` or `lon` are not written over the typed coordinates.
impl Serialize for PointRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = self
            .properties
            .iter()
            .filter(|(key, _)| key.as_str() != "lat" && key.as_str() != "lon");
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("lat", &self.lat)?;
        map.serialize_entry("lon", &self.lon)?;
        for (key, value) in extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
