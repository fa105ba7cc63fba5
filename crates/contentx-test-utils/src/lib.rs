//! Shared test fixtures for the contentx workspace.
//!
//! [`TestEnv`] lays out a throwaway sandbox: a manifest keyfile, a directory
//! of mounted extensions and a state directory for the snapshot. Dev-only,
//! never published.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

/// Reference prefix used by fixture extensions.
pub const REF_PREFIX: &str = "org.learningequality.Kolibri.Content.";

/// `(channel_id, node_ids, exclude_node_ids)`
pub type ChannelSpec<'a> = (&'a str, &'a [&'a str], &'a [&'a str]);

/// Full reference for a fixture extension name.
pub fn ext_ref(name: &str) -> String {
    format!("{REF_PREFIX}{name}")
}

/// A temporary sandbox with the same layout as `Settings::rooted_at`:
///
/// ```text
/// <root>/flatpak-info
/// <root>/extensions/<name>/content/content.json
/// <root>/state/content-extensions.json
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use contentx_test_utils::TestEnv;
///
/// let env = TestEnv::new();
/// env.add_extension("math", &[("math", &["n1", "n2"], &[])]);
/// env.attach(&[("math", "v1")]);
/// ```
pub struct TestEnv {
    temp_dir: TempDir,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root().join("flatpak-info")
    }

    pub fn extensions_dir(&self) -> PathBuf {
        self.root().join("extensions")
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root().join("state").join("content-extensions.json")
    }

    pub fn content_dir(&self, name: &str) -> PathBuf {
        self.extensions_dir().join(name).join("content")
    }

    /// Mount an extension with the given channels.
    pub fn add_extension(&self, name: &str, channels: &[ChannelSpec<'_>]) {
        let channels: Vec<_> = channels
            .iter()
            .map(|(channel_id, node_ids, exclude_node_ids)| {
                json!({
                    "channel_id": channel_id,
                    "node_ids": node_ids,
                    "exclude_node_ids": exclude_node_ids,
                })
            })
            .collect();
        let content = serde_json::to_string_pretty(&json!({ "channels": channels })).unwrap();
        self.add_extension_raw(name, &content);
    }

    /// Mount an extension whose `content.json` holds `content` verbatim.
    pub fn add_extension_raw(&self, name: &str, content: &str) {
        let dir = self.content_dir(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("content.json"), content).unwrap();
    }

    /// Create an extension directory without a content description.
    pub fn add_empty_extension(&self, name: &str) {
        fs::create_dir_all(self.content_dir(name)).unwrap();
    }

    /// Unmount an extension.
    pub fn remove_extension(&self, name: &str) {
        let dir = self.extensions_dir().join(name);
        if dir.exists() {
            fs::remove_dir_all(dir).unwrap();
        }
    }

    /// Write the manifest listing `(name, version)` fixture extensions.
    pub fn attach(&self, extensions: &[(&str, &str)]) {
        let refs: Vec<_> = extensions
            .iter()
            .map(|(name, version)| (ext_ref(name), version.to_string()))
            .collect();
        let pairs: Vec<_> = refs.iter().map(|(r, v)| (r.as_str(), v.as_str())).collect();
        self.attach_refs(&pairs);
    }

    /// Write the manifest listing raw `(reference, version)` pairs.
    pub fn attach_refs(&self, refs: &[(&str, &str)]) {
        let list = refs
            .iter()
            .map(|(r, v)| format!("{r}={v}"))
            .collect::<Vec<_>>()
            .join(";");
        self.write_manifest(&format!(
            "[Application]\nname=org.learningequality.Kolibri\n\n[Instance]\napp-extensions={list}\n"
        ));
    }

    /// Write the manifest keyfile verbatim.
    pub fn write_manifest(&self, content: &str) {
        fs::write(self.manifest_path(), content).unwrap();
    }

    /// Write the snapshot file verbatim.
    pub fn write_snapshot_raw(&self, content: &str) {
        let path = self.snapshot_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Parse the snapshot file as JSON.
    pub fn read_snapshot(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.snapshot_path()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    pub fn snapshot_exists(&self) -> bool {
        self.snapshot_path().exists()
    }
}
