//! Live environment manifests listing attached extensions.
//!
//! The sandbox exposes attached extensions in a keyfile, e.g.
//!
//! ```ini
//! [Instance]
//! app-extensions=org.learningequality.Kolibri.Content.math=3f2a;org.learningequality.Kolibri.Content.art=91bc
//! ```
//!
//! Readers here are tolerant: anything missing or malformed yields fewer (or
//! no) entries, never an error.

use std::collections::HashMap;
use std::path::PathBuf;

/// Default location of the sandbox metadata keyfile.
pub const DEFAULT_MANIFEST_PATH: &str = "/.flatpak-info";
/// Section holding instance metadata.
pub const DEFAULT_MANIFEST_SECTION: &str = "Instance";
/// Key listing attached extensions.
pub const DEFAULT_MANIFEST_KEY: &str = "app-extensions";

/// One `reference=version` pair from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub reference: String,
    pub version: String,
}

impl ManifestEntry {
    pub fn new(reference: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            version: version.into(),
        }
    }
}

/// A source of attached-extension entries.
pub trait ManifestSource {
    /// All entries currently listed. Never fails; an unreadable source is
    /// an empty list.
    fn entries(&self) -> Vec<ManifestEntry>;
}

/// Fixed list of entries, for embedding hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticManifest {
    entries: Vec<ManifestEntry>,
}

impl StaticManifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }
}

impl ManifestSource for StaticManifest {
    fn entries(&self) -> Vec<ManifestEntry> {
        self.entries.clone()
    }
}

/// Manifest read from a keyfile on disk.
#[derive(Debug, Clone)]
pub struct KeyFileManifest {
    path: PathBuf,
    section: String,
    key: String,
}

impl KeyFileManifest {
    pub fn new(
        path: impl Into<PathBuf>,
        section: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            section: section.into(),
            key: key.into(),
        }
    }

    /// Manifest at `path` using the default section and key.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DEFAULT_MANIFEST_SECTION, DEFAULT_MANIFEST_KEY)
    }
}

impl ManifestSource for KeyFileManifest {
    fn entries(&self) -> Vec<ManifestEntry> {
        let content = match contentx_fs::io::read_text_if_exists(&self.path) {
            Ok(Some(content)) => content,
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no manifest, assuming no extensions");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "manifest unreadable, assuming no extensions");
                return Vec::new();
            }
        };

        let keyfile = parse_keyfile(&content);
        match keyfile.get(&self.section).and_then(|s| s.get(&self.key)) {
            Some(value) => parse_extension_list(value),
            None => Vec::new(),
        }
    }
}

/// Parse `ref=version;ref=version` into entries.
///
/// Blank items and items without `=` are skipped. Only the first `=` splits
/// reference from version.
pub fn parse_extension_list(value: &str) -> Vec<ManifestEntry> {
    value
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| match item.split_once('=') {
            Some((reference, version)) => {
                Some(ManifestEntry::new(reference.trim(), version.trim()))
            }
            None => {
                tracing::debug!(item, "skipping manifest item without version");
                None
            }
        })
        .collect()
}

/// Minimal keyfile parser: `[section]` headers and `key=value` lines.
///
/// Comment lines start with `#` or `;`. Lines before the first section and
/// lines without `=` are ignored. Later duplicate keys win.
pub fn parse_keyfile(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let (Some(section), Some((key, value))) = (&current, line.split_once('=')) else {
            continue;
        };
        sections
            .entry(section.clone())
            .or_default()
            .insert(key.trim().to_string(), value.trim().to_string());
    }

    sections
}
