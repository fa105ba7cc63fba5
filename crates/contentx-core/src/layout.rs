//! Where extension content lives and how extension references are named.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::content::CONTENT_FILENAME;
use crate::error::{Error, Result};

/// Reference prefix shared by all content extensions by default.
pub const DEFAULT_REF_PREFIX: &str = "org.learningequality.Kolibri.Content.";

/// Default root directory under which extensions are mounted.
pub const DEFAULT_EXTENSIONS_DIR: &str = "/app/share/kolibri-content";

/// Maps extension references to names and names to content directories.
///
/// A reference is `<prefix><name>` where `name` is one or more word
/// characters. Content for `name` lives in `<extensions_dir>/<name>/content`.
#[derive(Debug, Clone)]
pub struct ContentLayout {
    ref_pattern: Regex,
    name_pattern: Regex,
    extensions_dir: PathBuf,
}

/// Same character class as the name capture in the reference pattern.
const NAME_PATTERN: &str = r"^\w+$";

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidRefPattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl ContentLayout {
    /// Build a layout for references starting with `ref_prefix`.
    ///
    /// The prefix is matched literally.
    pub fn new(ref_prefix: &str, extensions_dir: impl Into<PathBuf>) -> Result<Self> {
        let pattern = format!(r"^{}(?P<name>\w+)$", regex::escape(ref_prefix));
        Ok(Self {
            ref_pattern: compile(&pattern)?,
            name_pattern: compile(NAME_PATTERN)?,
            extensions_dir: extensions_dir.into(),
        })
    }

    /// Layout using [`DEFAULT_REF_PREFIX`] rooted at `extensions_dir`.
    pub fn with_default_prefix(extensions_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(DEFAULT_REF_PREFIX, extensions_dir)
    }

    /// Extract the extension name from a reference, if it is well formed.
    pub fn name_from_ref<'r>(&self, reference: &'r str) -> Option<&'r str> {
        self.ref_pattern
            .captures(reference)
            .and_then(|caps| caps.name("name"))
            .map(|m| m.as_str())
    }

    /// Whether `name` is a name [`ContentLayout::name_from_ref`] could
    /// have produced.
    pub fn is_valid_name(&self, name: &str) -> bool {
        self.name_pattern.is_match(name)
    }

    pub fn extensions_dir(&self) -> &Path {
        &self.extensions_dir
    }

    /// `<extensions_dir>/<name>`
    pub fn base_dir(&self, name: &str) -> PathBuf {
        self.extensions_dir.join(name)
    }

    /// `<extensions_dir>/<name>/content`
    pub fn content_dir(&self, name: &str) -> PathBuf {
        self.base_dir(name).join("content")
    }

    /// `<extensions_dir>/<name>/content/content.json`
    pub fn content_file(&self, name: &str) -> PathBuf {
        self.content_dir(name).join(CONTENT_FILENAME)
    }
}
