//! Reconciliation settings.
//!
//! Every path the engine touches is a settings value rather than a global, so
//! the whole flow can run against arbitrary directories.
//!
//! # Example TOML
//!
//! ```toml
//! manifest_path = "/.flatpak-info"
//! extensions_dir = "/app/share/kolibri-content"
//! snapshot_path = "/home/user/.local/share/kolibri/content-extensions.json"
//! ref_prefix = "org.learningequality.Kolibri.Content."
//! ```

use std::path::{Path, PathBuf};

use contentx_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::{ContentLayout, DEFAULT_EXTENSIONS_DIR, DEFAULT_REF_PREFIX};
use crate::manifest::{
    DEFAULT_MANIFEST_KEY, DEFAULT_MANIFEST_PATH, DEFAULT_MANIFEST_SECTION, KeyFileManifest,
};

/// Snapshot filename inside the host's state directory.
pub const SNAPSHOT_FILENAME: &str = "content-extensions.json";

/// Environment variable naming the host's state directory.
pub const HOME_ENV: &str = "KOLIBRI_HOME";

/// Where to read the live manifest and content, and where to keep the
/// snapshot. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keyfile listing attached extensions.
    pub manifest_path: PathBuf,
    /// Keyfile section holding the extension list.
    pub manifest_section: String,
    /// Keyfile key holding the extension list.
    pub manifest_key: String,
    /// Root under which each extension's content is mounted.
    pub extensions_dir: PathBuf,
    /// Snapshot of the extensions seen by the last reconciliation.
    pub snapshot_path: PathBuf,
    /// Reference prefix identifying content extensions.
    pub ref_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            manifest_section: DEFAULT_MANIFEST_SECTION.to_string(),
            manifest_key: DEFAULT_MANIFEST_KEY.to_string(),
            extensions_dir: PathBuf::from(DEFAULT_EXTENSIONS_DIR),
            snapshot_path: default_snapshot_path(),
            ref_prefix: DEFAULT_REF_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML, JSON or YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        match ConfigStore::new().load_if_exists(path)? {
            Some(settings) => Ok(settings),
            None => Err(Error::SettingsNotFound {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Settings with every path placed under `root`.
    ///
    /// Lays out `root/flatpak-info`, `root/extensions/` and
    /// `root/state/content-extensions.json`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            manifest_path: root.join("flatpak-info"),
            extensions_dir: root.join("extensions"),
            snapshot_path: root.join("state").join(SNAPSHOT_FILENAME),
            ..Self::default()
        }
    }

    pub fn layout(&self) -> Result<ContentLayout> {
        ContentLayout::new(&self.ref_prefix, &self.extensions_dir)
    }

    pub fn manifest(&self) -> KeyFileManifest {
        KeyFileManifest::new(
            &self.manifest_path,
            &self.manifest_section,
            &self.manifest_key,
        )
    }

    /// Lock file guarding the snapshot: `<snapshot>.lock`.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .snapshot_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.snapshot_path.with_file_name(name)
    }
}

/// `$KOLIBRI_HOME/content-extensions.json`, falling back to the user data
/// directory and finally the working directory.
fn default_snapshot_path() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
        return PathBuf::from(home).join(SNAPSHOT_FILENAME);
    }

    dirs::data_dir()
        .map(|d| d.join("kolibri"))
        .unwrap_or_else(|| PathBuf::from(".kolibri"))
        .join(SNAPSHOT_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.manifest_path, PathBuf::from("/.flatpak-info"));
        assert_eq!(settings.manifest_section, "Instance");
        assert_eq!(settings.manifest_key, "app-extensions");
        assert_eq!(settings.extensions_dir, PathBuf::from("/app/share/kolibri-content"));
        assert_eq!(settings.ref_prefix, DEFAULT_REF_PREFIX);
        assert!(settings.snapshot_path.ends_with(SNAPSHOT_FILENAME));
    }

    #[test]
    fn lock_path_sits_beside_snapshot() {
        let settings = Settings::rooted_at(Path::new("/tmp/x"));
        assert_eq!(
            settings.lock_path(),
            PathBuf::from("/tmp/x/state/content-extensions.json.lock")
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(r#"extensions_dir = "/opt/content""#).unwrap();
        assert_eq!(settings.extensions_dir, PathBuf::from("/opt/content"));
        assert_eq!(settings.manifest_key, "app-extensions");
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("contentx.toml")).unwrap_err();
        assert!(matches!(err, Error::SettingsNotFound { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contentx.toml");
        std::fs::write(&path, "ref_prefix = \"com.example.Content.\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.ref_prefix, "com.example.Content.");
    }
}
