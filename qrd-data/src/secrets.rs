//! Credential lookup for the table store.
//!
//! Providers are tried in order: the platform secret file under the project
//! root, then the process environment. An empty value counts as no value.

use indexmap::IndexMap;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use qrd_core::ProjectRoot;

/// Name of the table store's access token.
pub const STORE_TOKEN_KEY: &str = "REMOTE_STORE_TOKEN";

pub trait SecretProvider {
    fn get_secret(&self, key: &str) -> Option<String>;
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretProvider for EnvSecrets {
    fn get_secret(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().and_then(non_empty)
    }
}

/// Secrets from a YAML `key: value` file, read on every lookup.
#[derive(Debug, Clone)]
pub struct SecretsFile {
    path: PathBuf,
}

impl SecretsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Nested sections are allowed; only scalar values can be secrets.
    fn read(&self) -> anyhow::Result<IndexMap<String, Value>> {
        let text = std::fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(IndexMap::new());
        }
        Ok(serde_yaml::from_str(&text)?)
    }
}

impl SecretProvider for SecretsFile {
    fn get_secret(&self, key: &str) -> Option<String> {
        if !self.path.exists() {
            return None;
        }
        match self.read() {
            Ok(mut secrets) => secrets
                .swap_remove(key)
                .and_then(|value| scalar_text(&value))
                .and_then(non_empty),
            Err(e) => {
                log::warn!("[QRD] secrets: could not read {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

impl SecretProvider for HashMap<String, String> {
    fn get_secret(&self, key: &str) -> Option<String> {
        self.get(key).cloned().and_then(non_empty)
    }
}

/// The first provider with a non-empty answer wins.
#[derive(Default)]
pub struct SecretChain {
    providers: Vec<Box<dyn SecretProvider>>,
}

impl SecretChain {
    pub fn new(providers: Vec<Box<dyn SecretProvider>>) -> Self {
        Self { providers }
    }

    /// Platform secret file under the project root, then the environment.
    pub fn for_project(root: &ProjectRoot) -> Self {
        Self::new(vec![
            Box::new(SecretsFile::new(root.secrets_path())),
            Box::new(EnvSecrets),
        ])
    }
}

impl SecretProvider for SecretChain {
    fn get_secret(&self, key: &str) -> Option<String> {
        self.providers.iter().find_map(|p| p.get_secret(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn chain_prefers_earlier_providers() {
        let chain = SecretChain::new(vec![
            Box::new(map(&[("TOKEN", "from-platform")])),
            Box::new(map(&[("TOKEN", "from-env"), ("OTHER", "x")])),
        ]);
        assert_eq!(chain.get_secret("TOKEN").as_deref(), Some("from-platform"));
        assert_eq!(chain.get_secret("OTHER").as_deref(), Some("x"));
        assert_eq!(chain.get_secret("MISSING"), None);
    }

    #[test]
    fn empty_values_fall_through() {
        let chain = SecretChain::new(vec![
            Box::new(map(&[("TOKEN", "  ")])),
            Box::new(map(&[("TOKEN", "real")])),
        ]);
        assert_eq!(chain.get_secret("TOKEN").as_deref(), Some("real"));
    }

    #[test]
    fn secrets_file_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.yaml");
        let file = SecretsFile::new(&path);
        assert_eq!(file.get_secret(STORE_TOKEN_KEY), None);

        std::fs::write(&path, "REMOTE_STORE_TOKEN: abc123\n").unwrap();
        assert_eq!(file.get_secret(STORE_TOKEN_KEY).as_deref(), Some("abc123"));

        std::fs::write(
            &path,
            "database:\n  host: db.internal\n  port: 5432\nREMOTE_STORE_TOKEN: abc123\nretries: 3\n",
        )
        .unwrap();
        assert_eq!(file.get_secret(STORE_TOKEN_KEY).as_deref(), Some("abc123"));
        assert_eq!(file.get_secret("retries").as_deref(), Some("3"));
        assert_eq!(file.get_secret("database"), None);

        std::fs::write(&path, "[not, a, mapping]").unwrap();
        assert_eq!(file.get_secret(STORE_TOKEN_KEY), None);
    }

    #[test]
    fn project_chain_reads_root_secrets_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = ProjectRoot::new(dir.path());
        std::fs::write(root.secrets_path(), "QRD_TEST_ONLY_SECRET: from-file\n").unwrap();
        let chain = SecretChain::for_project(&root);
        assert_eq!(
            chain.get_secret("QRD_TEST_ONLY_SECRET").as_deref(),
            Some("from-file")
        );
    }
}
