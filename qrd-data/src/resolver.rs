//! Layer resolution: location string in, feature collection out.
//!
//! File locations are read from disk relative to the project root. Remote
//! locations need a credential from the secret chain and a configured table
//! store. Nothing here logs or panics; every failure comes back as a
//! [`ResolutionError`] for the caller to report.

use std::path::{Path, PathBuf};
use std::time::Duration;

use qrd_core::{FeatureCollection, ProjectRoot, RemoteStoreSettings};
use qrd_store::Store;

use crate::error::ResolutionError;
use crate::location::ResourceLocation;
use crate::secrets::{SecretProvider, STORE_TOKEN_KEY};

/// A source of remote tables.
pub trait RemoteStore {
    fn fetch_table(&self, table: &str, credential: &str) -> anyhow::Result<FeatureCollection>;
}

/// Remote tables served from a SQLite store file, opened fresh per fetch.
///
/// SQLite has no notion of tokens; the credential requirement is enforced
/// by [`ResourceResolver`] before a fetch is attempted.
#[derive(Debug, Clone)]
pub struct SqliteRemote {
    database: PathBuf,
    timeout: Duration,
}

impl SqliteRemote {
    pub fn new(database: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            database: database.into(),
            timeout,
        }
    }

    pub fn from_settings(root: &ProjectRoot, settings: &RemoteStoreSettings) -> Self {
        Self::new(
            root.resolve(&settings.database),
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

impl RemoteStore for SqliteRemote {
    fn fetch_table(&self, table: &str, _credential: &str) -> anyhow::Result<FeatureCollection> {
        Store::open(&self.database, self.timeout)?.query_features(table)
    }
}

/// An already open store, e.g. an in-memory one.
impl RemoteStore for Store {
    fn fetch_table(&self, table: &str, _credential: &str) -> anyhow::Result<FeatureCollection> {
        self.query_features(table)
    }
}

pub struct ResourceResolver<'a> {
    root: &'a ProjectRoot,
    secrets: &'a dyn SecretProvider,
    remote: Option<&'a dyn RemoteStore>,
}

impl<'a> ResourceResolver<'a> {
    pub fn new(root: &'a ProjectRoot, secrets: &'a dyn SecretProvider) -> Self {
        Self {
            root,
            secrets,
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: &'a dyn RemoteStore) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Resolve a layer location to its feature collection.
    pub fn resolve(&self, location: &str) -> Result<FeatureCollection, ResolutionError> {
        match ResourceLocation::classify(location) {
            ResourceLocation::Local(path) => self.resolve_file(&path),
            ResourceLocation::Remote(table) => self.resolve_remote(&table),
        }
    }

    fn resolve_file(&self, path: &Path) -> Result<FeatureCollection, ResolutionError> {
        let path = self.root.resolve(path);
        if !path.is_file() {
            return Err(ResolutionError::NotFound(path));
        }
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) => return Err(ResolutionError::Read { path, source }),
        };
        FeatureCollection::parse(&text).map_err(|source| ResolutionError::Parse { path, source })
    }

    fn resolve_remote(&self, table: &str) -> Result<FeatureCollection, ResolutionError> {
        let credential = self.secrets.get_secret(STORE_TOKEN_KEY).ok_or_else(|| {
            ResolutionError::MissingCredential {
                table: table.to_string(),
                key: STORE_TOKEN_KEY.to_string(),
            }
        })?;
        let remote = self
            .remote
            .ok_or_else(|| ResolutionError::NoRemoteStore(table.to_string()))?;
        remote
            .fetch_table(table, &credential)
            .map_err(|e| ResolutionError::Remote {
                table: table.to_string(),
                message: format!("{:#}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const HUBS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-87.6, 41.9]},
             "properties": {"name": "Chicago"}}
        ]
    }"#;

    fn token() -> HashMap<String, String> {
        HashMap::from([(STORE_TOKEN_KEY.to_string(), "secret".to_string())])
    }

    fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store
            .execute_batch(
                "CREATE TABLE centers (name TEXT, Longitude REAL, Latitude REAL);
                 INSERT INTO centers VALUES ('Ashburn', -77.5, 39.0);",
            )
            .unwrap();
        store
    }

    #[test]
    fn resolves_relative_file_against_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data_map")).unwrap();
        std::fs::write(dir.path().join("data_map/hubs.geojson"), HUBS).unwrap();
        let root = ProjectRoot::new(dir.path());
        let secrets: HashMap<String, String> = HashMap::new();

        let fc = ResourceResolver::new(&root, &secrets)
            .resolve("data_map/hubs.geojson")
            .unwrap();
        assert_eq!(fc.len(), 1);
    }

    #[test]
    fn resolves_absolute_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hubs.geojson");
        std::fs::write(&path, HUBS).unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let root = ProjectRoot::new(elsewhere.path());
        let secrets: HashMap<String, String> = HashMap::new();

        let resolver = ResourceResolver::new(&root, &secrets);
        assert!(resolver.resolve(path.to_str().unwrap()).is_ok());
    }

    #[test]
    fn missing_and_malformed_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.geojson"), "{ nope").unwrap();
        let root = ProjectRoot::new(dir.path());
        let secrets: HashMap<String, String> = HashMap::new();
        let resolver = ResourceResolver::new(&root, &secrets);

        assert!(matches!(
            resolver.resolve("absent.geojson"),
            Err(ResolutionError::NotFound(_))
        ));
        assert!(matches!(
            resolver.resolve("broken.geojson"),
            Err(ResolutionError::Parse { .. })
        ));
    }

    #[test]
    fn remote_requires_credential() {
        let dir = tempfile::tempdir().unwrap();
        let root = ProjectRoot::new(dir.path());
        let secrets: HashMap<String, String> = HashMap::new();
        let store = seeded_store();

        let result = ResourceResolver::new(&root, &secrets)
            .with_remote(&store)
            .resolve("remote://centers");
        assert!(matches!(
            result,
            Err(ResolutionError::MissingCredential { .. })
        ));
    }

    #[test]
    fn remote_requires_configured_store() {
        let dir = tempfile::tempdir().unwrap();
        let root = ProjectRoot::new(dir.path());
        let secrets = token();

        let result = ResourceResolver::new(&root, &secrets).resolve("remote://centers");
        assert!(matches!(result, Err(ResolutionError::NoRemoteStore(table)) if table == "centers"));
    }

    #[test]
    fn remote_table_is_fetched_with_credential() {
        let dir = tempfile::tempdir().unwrap();
        let root = ProjectRoot::new(dir.path());
        let secrets = token();
        let store = seeded_store();
        let resolver = ResourceResolver::new(&root, &secrets).with_remote(&store);

        let fc = resolver.resolve("remote://centers").unwrap();
        assert_eq!(fc.len(), 1);

        assert!(matches!(
            resolver.resolve("remote://missing_table"),
            Err(ResolutionError::Remote { .. })
        ));
    }

    #[test]
    fn sqlite_remote_opens_store_file_per_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let root = ProjectRoot::new(dir.path());
        write_store_file(&dir.path().join("store.sqlite"));
        let remote = SqliteRemote::from_settings(
            &root,
            &RemoteStoreSettings {
                database: "store.sqlite".into(),
                timeout_secs: 1,
            },
        );
        let fc = remote.fetch_table("centers", "secret").unwrap();
        assert_eq!(fc.len(), 1);

        let unreachable = SqliteRemote::new(dir.path().join("absent.sqlite"), Duration::from_secs(1));
        assert!(unreachable.fetch_table("centers", "secret").is_err());
    }

    /// Write a store file through an in-memory store's `VACUUM INTO`.
    fn write_store_file(path: &Path) {
        let store = seeded_store();
        store
            .execute_batch(&format!("VACUUM INTO '{}';", path.display()))
            .unwrap();
    }
}
