use std::path::PathBuf;

/// Prefixes marking a layer location as a table in the remote store.
pub const REMOTE_SCHEMES: [&str; 2] = ["remote://", "md:"];

/// Where a layer's data lives, classified once from its location string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocation {
    /// A GeoJSON file, absolute or relative to the project root.
    Local(PathBuf),
    /// A table in the remote store.
    Remote(String),
}

impl ResourceLocation {
    pub fn classify(location: &str) -> Self {
        let location = location.trim();
        REMOTE_SCHEMES
            .iter()
            .find_map(|scheme| location.strip_prefix(scheme))
            .map(|table| Self::Remote(table.trim().to_string()))
            .unwrap_or_else(|| Self::Local(PathBuf::from(location)))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_remote_tables() {
        assert_eq!(
            ResourceLocation::classify("remote://data_centers"),
            ResourceLocation::Remote("data_centers".into())
        );
        assert_eq!(
            ResourceLocation::classify("md:quantum.main.hubs"),
            ResourceLocation::Remote("quantum.main.hubs".into())
        );
        assert!(ResourceLocation::classify(" remote://x ").is_remote());
    }

    #[test]
    fn everything_else_is_a_file() {
        assert_eq!(
            ResourceLocation::classify("data_map/hubs.geojson"),
            ResourceLocation::Local(PathBuf::from("data_map/hubs.geojson"))
        );
        assert_eq!(
            ResourceLocation::classify("/srv/hubs.geojson"),
            ResourceLocation::Local(PathBuf::from("/srv/hubs.geojson"))
        );
        assert!(!ResourceLocation::classify("https://example.com/hubs.geojson").is_remote());
    }
}
