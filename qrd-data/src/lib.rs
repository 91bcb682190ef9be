//! Data preparation for the quantum resource dashboard.
//!
//! Turns a [`qrd_core::ConfigurationDocument`] into what the charts and the
//! map draw:
//!
//! - [`resolver`] fetches each layer's GeoJSON from a file or the table store
//! - [`points`] flattens feature collections into point records
//! - [`chart`] aggregates scenario entries per metric and scale
//! - [`layers`] runs resolution for every registered layer, dropping the
//!   ones that fail
//! - [`dashboard`] and [`view`] bundle it all into one render pass
//!
//! Failures stay contained: a broken layer, a bad feature or an empty
//! scenario degrade to an empty or zero result and never abort the pass.

pub mod chart;
pub mod dashboard;
pub mod error;
pub mod layers;
pub mod location;
pub mod points;
pub mod resolver;
pub mod secrets;
pub mod view;

pub use chart::{aggregate, chart_panels, selectable_scales, ChartPanel, SeriesRow};
pub use dashboard::Dashboard;
pub use error::ResolutionError;
pub use layers::{load_map_layers, LayerWarning, MapLayers};
pub use location::ResourceLocation;
pub use points::extract_points;
pub use resolver::{RemoteStore, ResourceResolver, SqliteRemote};
pub use secrets::{EnvSecrets, SecretChain, SecretProvider, SecretsFile, STORE_TOKEN_KEY};
pub use view::{MapTrace, RenderPass, Selection};
