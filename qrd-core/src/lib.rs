//! Core types for the quantum resource dashboard.
//!
//! Everything downstream crates share lives here: the project root that
//! anchors relative paths, the YAML configuration document with its chart
//! series and layer registry, the map style document, and the GeoJSON
//! shapes that layers are parsed into.

pub mod document;
pub mod geo;
pub mod project;
pub mod series;
pub mod style;

pub use document::{ChartInfo, ConfigurationDocument, DisplayText, LayerRegistry, RemoteStoreSettings};
pub use geo::{Feature, FeatureCollection, Geometry, PointRecord};
pub use project::ProjectRoot;
pub use series::{ChartSeries, SeriesEntry};
pub use style::{LayerStyle, PartialStyle, StyleDocument};
