//! Error types for contentx-core

use std::path::PathBuf;

/// Result type for contentx-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in contentx-core operations
///
/// Reading manifests, content descriptions and snapshots never fails; those
/// paths degrade to empty results. Only writes, settings and the host
/// registry surface errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured reference prefix does not form a valid pattern
    #[error("invalid extension reference pattern '{pattern}': {source}")]
    InvalidRefPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Settings file not found at the given path
    #[error("Settings not found at {path}")]
    SettingsNotFound { path: PathBuf },

    /// The host registry rejected a channel's changes
    #[error("Registry failed to apply changes for channel '{channel_id}': {message}")]
    Registry { channel_id: String, message: String },

    /// Filesystem error from contentx-fs
    #[error(transparent)]
    Fs(#[from] contentx_fs::Error),
}

impl Error {
    /// Create a registry error for `channel_id`.
    pub fn registry(channel_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registry {
            channel_id: channel_id.into(),
            message: message.into(),
        }
    }
}
