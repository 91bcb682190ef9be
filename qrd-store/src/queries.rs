//! Table queries that turn store rows into GeoJSON features.
//!
//! Every row becomes one point feature: the longitude and latitude columns
//! form the geometry and every other column lands in the property bag.

use crate::Store;
use qrd_core::{Feature, FeatureCollection};
use rusqlite::types::ValueRef;
use serde_json::{Map, Number, Value};

pub const LONGITUDE_COLUMN: &str = "Longitude";
pub const LATITUDE_COLUMN: &str = "Latitude";

/// Quote a possibly dotted table name (`schema.table`) part by part.
fn quote_table_name(table: &str) -> String {
    table
        .split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        // Blobs have no meaningful map label.
        ValueRef::Blob(_) => Value::Null,
    }
}

fn to_coordinate(value: ValueRef<'_>) -> Option<f64> {
    match value {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok()?.trim().parse().ok(),
        _ => None,
    }
}

impl Store {
    /// Read every row of `table` as a point feature collection.
    ///
    /// Coordinate columns are matched case-insensitively; a table without
    /// both is an error. Rows with missing coordinates are kept with null
    /// positions and left for the point extractor to drop.
    pub fn query_features(&self, table: &str) -> anyhow::Result<FeatureCollection> {
        if table.trim().is_empty() {
            anyhow::bail!("empty table name");
        }
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_table_name(table)))?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let find = |wanted: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(wanted));
        let (Some(lon_idx), Some(lat_idx)) = (find(LONGITUDE_COLUMN), find(LATITUDE_COLUMN)) else {
            anyhow::bail!(
                "table '{}' lacks {}/{} columns (has: {})",
                table,
                LONGITUDE_COLUMN,
                LATITUDE_COLUMN,
                columns.join(", ")
            );
        };

        let mut features = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let lon = to_coordinate(row.get_ref(lon_idx)?);
            let lat = to_coordinate(row.get_ref(lat_idx)?);
            let mut properties = Map::new();
            for (idx, name) in columns.iter().enumerate() {
                if idx == lon_idx || idx == lat_idx {
                    continue;
                }
                properties.insert(name.clone(), to_json(row.get_ref(idx)?));
            }
            features.push(Feature::point(lon, lat, properties));
        }

        log::info!(
            "[QRD] store: query_features('{}') returned {} rows",
            table,
            features.len()
        );
        Ok(FeatureCollection::new(features))
    }
}
