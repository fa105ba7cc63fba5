//! Format-agnostic loading and saving of structured files

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, io};

/// Structured file formats understood by [`ConfigStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    /// Detect the format from a file extension.
    ///
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Format-agnostic structured file store.
///
/// Detects the format from the file extension unless one is forced with
/// [`ConfigStore::with_format`]. Saving always goes through
/// [`io::write_atomic`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore {
    format: Option<Format>,
}

impl ConfigStore {
    /// Create a store that detects format from the file extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that always uses `format`.
    pub fn with_format(format: Format) -> Self {
        Self {
            format: Some(format),
        }
    }

    fn format_for(&self, path: &Path) -> Result<Format> {
        match self.format {
            Some(format) => Ok(format),
            None => Format::from_path(path),
        }
    }

    /// Load and deserialize a file.
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let format = self.format_for(path)?;
        let content = io::read_text(path)?;
        Self::parse(path, format, &content)
    }

    /// Load a file, returning `None` when it does not exist.
    pub fn load_if_exists<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let format = self.format_for(path)?;
        match io::read_text_if_exists(path)? {
            Some(content) => Self::parse(path, format, &content).map(Some),
            None => Ok(None),
        }
    }

    fn parse<T: DeserializeOwned>(path: &Path, format: Format, content: &str) -> Result<T> {
        let parse_error = |message: String| Error::Parse {
            path: path.to_path_buf(),
            format: format.name().into(),
            message,
        };

        match format {
            Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string())),
        }
    }

    /// Serialize and atomically write a file.
    pub fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let format = self.format_for(path)?;
        let serialize_error = |message: String| Error::Serialize {
            path: path.to_path_buf(),
            format: format.name().into(),
            message,
        };

        let content = match format {
            Format::Toml => {
                toml::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))?
            }
            Format::Json => {
                serde_json::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))?
            }
            Format::Yaml => {
                serde_yaml::to_string(value).map_err(|e| serialize_error(e.to_string()))?
            }
        };

        io::write_atomic(path, content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection_is_case_insensitive() {
        assert_eq!(Format::from_path(Path::new("a.JSON")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.yml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.toml")).unwrap(), Format::Toml);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = Format::from_path(Path::new("snapshot.dat")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref extension } if extension == "dat"));
    }
}
