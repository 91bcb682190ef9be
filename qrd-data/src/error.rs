/// Error types for layer resolution
use std::path::PathBuf;
use thiserror::Error;

/// Why a layer's data could not be produced.
///
/// The resolver returns these instead of logging; whoever consumes the
/// result decides how loudly to report it.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// Local file does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Local file exists but could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Local file is not a GeoJSON feature collection
    #[error("{} is not a GeoJSON feature collection: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No access credential for the table store
    #[error("no '{key}' credential available for remote table '{table}'")]
    MissingCredential { table: String, key: String },

    /// A remote table was requested but no store is configured
    #[error("no remote store configured for table '{0}'")]
    NoRemoteStore(String),

    /// The store query or connection failed
    #[error("remote table '{table}' is unavailable: {message}")]
    Remote { table: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_resource() {
        let err = ResolutionError::NotFound(PathBuf::from("/data/hubs.geojson"));
        assert_eq!(err.to_string(), "file not found: /data/hubs.geojson");

        let err = ResolutionError::MissingCredential {
            table: "data_centers".into(),
            key: "REMOTE_STORE_TOKEN".into(),
        };
        assert!(err.to_string().contains("data_centers"));
        assert!(err.to_string().contains("REMOTE_STORE_TOKEN"));
    }
}
