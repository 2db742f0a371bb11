use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A plain stored file inside the gallery container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    /// Blob name, unique within the container
    pub name: String,

    /// Public URI assigned by the store
    pub uri: String,
}

/// One entry of a container listing.
///
/// Listings delimited by `/` return plain files next to virtual directory
/// prefixes. Only [`StoreEntry::File`] entries are images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEntry {
    File(StoredBlob),
    VirtualDirectory { prefix: String },
}

impl StoreEntry {
    pub fn as_file(&self) -> Option<&StoredBlob> {
        match self {
            Self::File(blob) => Some(blob),
            Self::VirtualDirectory { .. } => None,
        }
    }

    pub fn into_file(self) -> Option<StoredBlob> {
        match self {
            Self::File(blob) => Some(blob),
            Self::VirtualDirectory { .. } => None,
        }
    }
}

/// A file received from the client, before it is named and stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub original_name: String,
    pub content: Bytes,
}

impl ImageUpload {
    pub fn new(original_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            original_name: original_name.into(),
            content: content.into(),
        }
    }

    /// Browsers submit an empty part when the file picker was left empty.
    pub fn is_placeholder(&self) -> bool {
        self.original_name.trim().is_empty() && self.content.is_empty()
    }
}
