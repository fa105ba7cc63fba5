//! Sets of attached extensions and their snapshot persistence.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use contentx_fs::ConfigStore;

use crate::error::Result;
use crate::layout::ContentLayout;
use crate::manifest::ManifestSource;
use crate::record::{ExtensionRecord, SnapshotEntry};

/// An unordered set of extensions, keyed by name and version.
///
/// Two records with the same name but different versions are distinct
/// members; nothing here enforces one version per name.
#[derive(Debug, Clone, Default)]
pub struct ExtensionSet {
    extensions: HashSet<ExtensionRecord>,
}

impl ExtensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set of extensions attached right now.
    ///
    /// Entries whose reference does not name a content extension, or whose
    /// content is missing on disk, are left out.
    pub fn from_live_environment(source: &dyn ManifestSource, layout: &ContentLayout) -> Self {
        let mut extensions = HashSet::new();

        for entry in source.entries() {
            let Some(record) = ExtensionRecord::parse(layout, &entry.reference, &entry.version)
            else {
                tracing::debug!(reference = %entry.reference, "not a content extension, skipping");
                continue;
            };

            if !record.is_valid() {
                tracing::warn!(
                    extension = %record,
                    content_dir = %record.content_dir().display(),
                    "content extension has no content description, skipping"
                );
                continue;
            }

            extensions.insert(record);
        }

        tracing::debug!(count = extensions.len(), "loaded live extensions");
        Self { extensions }
    }

    /// Load the set persisted by [`ExtensionSet::save`].
    ///
    /// A missing or corrupt snapshot is an empty set. Entries that fail to
    /// deserialize are skipped individually.
    pub fn from_snapshot(path: &Path, layout: &ContentLayout) -> Self {
        let raw: Vec<serde_json::Value> = match ConfigStore::new().load_if_exists(path) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no snapshot, assuming no extensions were attached");
                return Self::new();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "snapshot unreadable, assuming no extensions were attached");
                return Self::new();
            }
        };

        let extensions = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<SnapshotEntry>(value) {
                Ok(entry) => {
                    let name = entry.name.clone();
                    let record = ExtensionRecord::from_snapshot_entry(layout, entry);
                    if record.is_none() {
                        tracing::warn!(%name, "snapshot entry has an invalid name, skipping");
                    }
                    record
                }
                Err(e) => {
                    tracing::warn!(error = %e, "malformed snapshot entry, skipping");
                    None
                }
            })
            .collect::<HashSet<_>>();

        tracing::debug!(count = extensions.len(), path = %path.display(), "loaded snapshot");
        Self { extensions }
    }

    /// Persist every member to `path`.
    ///
    /// Content indexes are resolved first so the snapshot is self-contained.
    /// The write is atomic; a crash leaves the previous snapshot intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let entries = self.snapshot_entries();
        ConfigStore::new().save(path, &entries)?;
        tracing::debug!(count = entries.len(), path = %path.display(), "saved snapshot");
        Ok(())
    }

    /// Snapshot entries for all members, ordered by key.
    pub fn snapshot_entries(&self) -> Vec<SnapshotEntry> {
        self.iter().map(ExtensionRecord::to_snapshot_entry).collect()
    }

    /// Members of `self` absent from `other`, ordered by key.
    pub fn difference<'a>(&'a self, other: &ExtensionSet) -> Vec<&'a ExtensionRecord> {
        let mut records: Vec<_> = self
            .extensions
            .iter()
            .filter(|record| !other.extensions.contains(*record))
            .collect();
        records.sort();
        records
    }

    /// Extensions present in `new` but not in `old`.
    pub fn added<'a>(old: &ExtensionSet, new: &'a ExtensionSet) -> Vec<&'a ExtensionRecord> {
        new.difference(old)
    }

    /// Extensions present in `old` but not in `new`.
    pub fn removed<'a>(old: &'a ExtensionSet, new: &ExtensionSet) -> Vec<&'a ExtensionRecord> {
        old.difference(new)
    }

    /// Content directories of every member, sorted.
    ///
    /// Hosts can pass these as additional content lookup locations.
    pub fn content_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<_> = self
            .extensions
            .iter()
            .map(|r| r.content_dir().to_path_buf())
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }

    /// Add a record. Returns `false` if one with the same key was present.
    pub fn insert(&mut self, record: ExtensionRecord) -> bool {
        self.extensions.insert(record)
    }

    pub fn contains(&self, record: &ExtensionRecord) -> bool {
        self.extensions.contains(record)
    }

    /// Look up a member by name and version.
    pub fn get(&self, name: &str, version: &str) -> Option<&ExtensionRecord> {
        self.extensions
            .iter()
            .find(|r| r.name() == name && r.version() == version)
    }

    /// Members ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = &ExtensionRecord> {
        let mut records: Vec<_> = self.extensions.iter().collect();
        records.sort();
        records.into_iter()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl FromIterator<ExtensionRecord> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = ExtensionRecord>>(iter: I) -> Self {
        Self {
            extensions: iter.into_iter().collect(),
        }
    }
}

impl PartialEq for ExtensionSet {
    fn eq(&self, other: &Self) -> bool {
        self.extensions == other.extensions
    }
}

impl Eq for ExtensionSet {}
