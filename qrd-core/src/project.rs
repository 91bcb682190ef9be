use std::path::{Path, PathBuf};

/// File name of the dashboard configuration document.
pub const CONFIG_FILE_NAME: &str = "DashboardInput.yaml";

/// File name of the platform secret store.
pub const SECRETS_FILE_NAME: &str = "secrets.yaml";

/// The directory every relative resource path is resolved against.
///
/// Resolution never consults the process working directory, so a dashboard
/// behaves the same no matter where it was launched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    dir: PathBuf,
}

impl ProjectRoot {
    /// Anchor a project at `dir`.
    ///
    /// The directory is canonicalized when it exists; otherwise it is kept
    /// verbatim so that lookups below it simply fail as missing files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let dir = dir.canonicalize().unwrap_or(dir);
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve `path` against the project root. Absolute paths pass through.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn secrets_path(&self) -> PathBuf {
        self.dir.join(SECRETS_FILE_NAME)
    }
}
