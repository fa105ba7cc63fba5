//! A single attached content extension.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::content::{CONTENT_FILENAME, ContentIndex};
use crate::layout::ContentLayout;

/// Identity of an extension record: its name and exact version token.
///
/// Versions are opaque (typically commit hashes) and never compared
/// ordinally; ordering here only exists to make output deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordKey {
    pub name: String,
    pub version: String,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// One entry of a persisted snapshot.
///
/// `commit` is accepted as an alias of `version` for snapshots written by
/// older tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    #[serde(rename = "ref")]
    pub reference: String,
    pub name: String,
    #[serde(alias = "commit")]
    pub version: String,
    #[serde(default)]
    pub content: Option<ContentIndex>,
}

/// An attached content extension.
///
/// Equality and hashing use [`RecordKey`] only. The content index is
/// resolved from disk on first access and memoized; it never takes part in
/// identity.
#[derive(Debug, Clone)]
pub struct ExtensionRecord {
    reference: String,
    name: String,
    version: String,
    content_dir: PathBuf,
    content: OnceLock<ContentIndex>,
}

impl ExtensionRecord {
    /// Parse a live `reference`/`version` pair.
    ///
    /// Returns `None` when the reference does not match the layout's naming
    /// pattern; callers skip such entries.
    pub fn parse(layout: &ContentLayout, reference: &str, version: &str) -> Option<Self> {
        let name = layout.name_from_ref(reference)?;
        Some(Self {
            reference: reference.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            content_dir: layout.content_dir(name),
            content: OnceLock::new(),
        })
    }

    /// Rebuild a record from a snapshot entry without touching disk.
    ///
    /// Returns `None` when the entry's name is not a well-formed extension
    /// name. A content index stored in the entry is used as the resolved
    /// index.
    pub fn from_snapshot_entry(layout: &ContentLayout, entry: SnapshotEntry) -> Option<Self> {
        if !layout.is_valid_name(&entry.name) {
            return None;
        }

        let content = OnceLock::new();
        if let Some(index) = entry.content {
            let _ = content.set(index);
        }

        Some(Self {
            content_dir: layout.content_dir(&entry.name),
            reference: entry.reference,
            name: entry.name,
            version: entry.version,
            content,
        })
    }

    /// Serialize for a snapshot.
    ///
    /// Resolves the content index first, so snapshots never depend on the
    /// extension still being present on disk when they are read back.
    pub fn to_snapshot_entry(&self) -> SnapshotEntry {
        SnapshotEntry {
            reference: self.reference.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            content: Some(self.content_index().clone()),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }

    /// `<extensions_dir>/<name>/content`
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    fn content_file(&self) -> PathBuf {
        self.content_dir.join(CONTENT_FILENAME)
    }

    /// Whether the extension's content directory and description exist.
    ///
    /// Only meaningful for live records; snapshot records were validated
    /// when they were first cached.
    pub fn is_valid(&self) -> bool {
        self.content_dir.is_dir() && self.content_file().is_file()
    }

    /// The extension's content index, resolved at most once.
    pub fn content_index(&self) -> &ContentIndex {
        self.content
            .get_or_init(|| ContentIndex::load_or_empty(&self.content_file()))
    }

    /// Whether the content index has been resolved or was restored from a
    /// snapshot.
    pub fn is_content_resolved(&self) -> bool {
        self.content.get().is_some()
    }

    fn key_ref(&self) -> (&str, &str) {
        (&self.name, &self.version)
    }
}

impl PartialEq for ExtensionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key_ref() == other.key_ref()
    }
}

impl Eq for ExtensionRecord {}

impl Hash for ExtensionRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_ref().hash(state);
    }
}

impl PartialOrd for ExtensionRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExtensionRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_ref().cmp(&other.key_ref())
    }
}

impl fmt::Display for ExtensionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
