use crate::domain::image::errors::GalleryError;
use serde::Serialize;

/// A file that reached the store.
#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    pub original_name: String,
    pub blob_name: String,
    pub uri: String,
}

/// A file that could not be written.
#[derive(Debug, Clone, Serialize)]
pub struct FailedUpload {
    pub original_name: String,
    pub error: String,
    #[serde(skip)]
    pub cause: GalleryError,
}

/// Per-file outcome of an upload batch, in submission order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadReport {
    pub stored: Vec<StoredImage>,
    pub failed: Vec<FailedUpload>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.stored.len() + self.failed.len()
    }
}
