//! Content descriptions shipped by extensions.
//!
//! Each extension carries a `content.json` document listing the channels it
//! contributes and, per channel, which content nodes it includes and
//! excludes:
//!
//! ```json
//! {
//!   "channels": [
//!     {
//!       "channel_id": "math",
//!       "node_ids": ["n1", "n2"],
//!       "exclude_node_ids": []
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// The canonical filename of an extension's content description.
pub const CONTENT_FILENAME: &str = "content.json";

/// One channel an extension contributes content to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel identifier in the host's content registry.
    pub channel_id: String,
    /// Node identifiers included by this extension.
    #[serde(default)]
    pub node_ids: Vec<String>,
    /// Node identifiers explicitly excluded by this extension.
    #[serde(default)]
    pub exclude_node_ids: Vec<String>,
}

impl Channel {
    pub fn new(
        channel_id: impl Into<String>,
        node_ids: impl IntoIterator<Item = impl Into<String>>,
        exclude_node_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            node_ids: node_ids.into_iter().map(Into::into).collect(),
            exclude_node_ids: exclude_node_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// The full set of channels an extension provides.
///
/// An empty index (no channels) is also what a missing or malformed content
/// description resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentIndex {
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl ContentIndex {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self { channels }
    }

    /// Read a content description, falling back to an empty index.
    ///
    /// Missing, unreadable and malformed files are logged and treated as
    /// "no channels".
    pub fn load_or_empty(path: &Path) -> Self {
        let content = match contentx_fs::io::read_text(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "content description unreadable, assuming no channels");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "content description malformed, assuming no channels");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Look up a channel by id.
    pub fn channel(&self, channel_id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.channel_id == channel_id)
    }
}
