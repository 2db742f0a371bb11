pub mod azure_blob_store;
pub mod s3_blob_store;
pub mod traits;

use crate::{
    config::{Config, StorageBackend},
    domain::image::errors::GalleryError,
};
use azure_blob_store::AzureBlobStore;
use s3_blob_store::S3BlobStore;
use std::sync::Arc;
use traits::BlobStore;

/// Builds the store driver selected by `STORAGE_BACKEND`.
///
/// # Errors
///
/// Returns `GalleryError::Connection` if the credential for the selected
/// backend is malformed.
pub fn build_blob_store(config: &Config) -> Result<Arc<dyn BlobStore>, GalleryError> {
    let container = config.storage_container.as_str().to_string();
    match &config.storage_backend {
        StorageBackend::Azure { connection_string } => {
            let store = AzureBlobStore::from_connection_string(connection_string, container)
                .map_err(|e| GalleryError::connection(&e))?;
            Ok(Arc::new(store))
        }
        StorageBackend::S3(settings) => {
            Ok(Arc::new(S3BlobStore::new(settings.clone(), container)))
        }
    }
}
