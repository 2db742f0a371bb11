use super::dto::{FailedUpload, StoredImage, UploadReport};
use crate::{
    domain::image::{
        entity::{ImageUpload, StoreEntry, StoredBlob},
        errors::GalleryError,
        value_objects::{BlobName, content_type_for},
    },
    infrastructure::storage::traits::BlobStore,
};
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, error, info, instrument, warn};

/// Mediates between the HTTP handlers and the remote blob store.
///
/// Built once at startup by [`GalleryService::initialize`] and shared
/// read-only by every request. Each store call is bounded by the configured
/// timeout; nothing is retried.
pub struct GalleryService {
    store: Arc<dyn BlobStore>,
    container: String,
    timeout: Duration,
}

impl GalleryService {
    /// Wraps a store without touching the remote container.
    pub fn new(store: Arc<dyn BlobStore>, container: impl Into<String>, timeout: Duration) -> Self {
        Self {
            store,
            container: container.into(),
            timeout,
        }
    }

    /// Builds the service and makes sure the container exists with
    /// blob-level public read access.
    ///
    /// Safe to run against a container that is already set up.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Connection` if the store cannot be reached or
    /// refuses the container setup.
    #[instrument(skip_all, fields(container = container.as_ref()))]
    pub async fn initialize(
        store: Arc<dyn BlobStore>,
        container: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self, GalleryError> {
        let service = Self::new(store, container.as_ref(), timeout);
        service.ensure_container().await.map_err(|e| {
            error!("Container setup failed: {:#}", e);
            GalleryError::connection(&e)
        })?;
        info!("Gallery container {} ready", service.container);
        Ok(service)
    }

    async fn ensure_container(&self) -> anyhow::Result<()> {
        let exists = self
            .call("check container", self.store.container_exists())
            .await?;
        if !exists {
            info!("Container {} not found, creating it", self.container);
            self.call("create container", self.store.create_container())
                .await?;
        }
        self.call("set public access", self.store.set_public_access())
            .await
    }

    /// Public URIs of every plain file in the container, in store order.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::StoreUnavailable` on transport or service failure.
    #[instrument(skip(self))]
    pub async fn list_images(&self) -> Result<Vec<String>, GalleryError> {
        let files = self.list_files().await?;
        debug!("Listed {} images", files.len());
        Ok(files.into_iter().map(|blob| blob.uri).collect())
    }

    async fn list_files(&self) -> Result<Vec<StoredBlob>, GalleryError> {
        let entries = self
            .call("list blobs", self.store.list_entries())
            .await
            .map_err(|e| {
                error!("Listing container {} failed: {:#}", self.container, e);
                GalleryError::store_unavailable(&e)
            })?;

        Ok(entries
            .into_iter()
            .filter_map(StoreEntry::into_file)
            .collect())
    }

    /// Stores every file under a freshly generated name.
    ///
    /// Files are written one at a time in submission order. A failing file
    /// does not stop the batch; it is recorded in the report instead.
    /// Browser placeholder parts (no name, no content) are skipped.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn upload_images(&self, files: Vec<ImageUpload>) -> UploadReport {
        let mut report = UploadReport::default();

        for file in files.into_iter().filter(|f| !f.is_placeholder()) {
            let blob_name = BlobName::generate(&file.original_name);
            let content_type = content_type_for(blob_name.as_str());
            let size = file.content.len();

            let result = self
                .call(
                    "put blob",
                    self.store
                        .put_blob(blob_name.as_str(), file.content, &content_type),
                )
                .await;

            match result {
                Ok(uri) => {
                    debug!(
                        "Stored {} as {} ({} bytes)",
                        file.original_name, blob_name, size
                    );
                    report.stored.push(StoredImage {
                        original_name: file.original_name,
                        blob_name: blob_name.into_inner(),
                        uri,
                    });
                }
                Err(e) => {
                    warn!("Upload of {} failed: {:#}", file.original_name, e);
                    let cause = GalleryError::upload(&file.original_name, &e);
                    report.failed.push(FailedUpload {
                        original_name: file.original_name,
                        error: cause.to_string(),
                        cause,
                    });
                }
            }
        }

        info!(
            "Upload batch finished: {} stored, {} failed",
            report.stored.len(),
            report.failed.len()
        );
        report
    }

    /// Deletes the blob named by a public URI or a bare name.
    ///
    /// Deleting a blob that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::InvalidInput` if no name can be extracted and
    /// `GalleryError::StoreUnavailable` on transport or service failure.
    #[instrument(skip(self))]
    pub async fn delete_image(&self, name_or_uri: &str) -> Result<BlobName, GalleryError> {
        let name = BlobName::from_name_or_uri(name_or_uri)?;

        self.call("delete blob", self.store.delete_blob(name.as_str()))
            .await
            .map_err(|e| {
                error!("Deleting {} failed: {:#}", name, e);
                GalleryError::store_unavailable(&e)
            })?;

        info!("Deleted image {}", name);
        Ok(name)
    }

    /// Deletes every plain file currently listed in the container.
    ///
    /// Stops at the first failure; blobs deleted before it stay deleted.
    /// Returns the number of deleted blobs.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::StoreUnavailable` on transport or service failure.
    #[instrument(skip(self))]
    pub async fn delete_all_images(&self) -> Result<usize, GalleryError> {
        let files = self.list_files().await?;
        let total = files.len();

        for (deleted, blob) in files.iter().enumerate() {
            self.call("delete blob", self.store.delete_blob(&blob.name))
                .await
                .map_err(|e| {
                    error!(
                        "Bulk delete stopped at {} after {} of {} blobs: {:#}",
                        blob.name, deleted, total, e
                    );
                    GalleryError::store_unavailable(&e)
                })?;
        }

        info!("Deleted {} images", total);
        Ok(total)
    }

    /// Confirms the container is reachable.
    pub async fn check_store(&self) -> Result<(), GalleryError> {
        match self.call("check container", self.store.container_exists()).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(GalleryError::store_unavailable(&anyhow::anyhow!(
                "container {} does not exist",
                self.container
            ))),
            Err(e) => Err(GalleryError::store_unavailable(&e)),
        }
    }

    async fn call<T, F>(&self, operation: &str, fut: F) -> anyhow::Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "{} on {} timed out after {:?}",
                operation,
                self.container,
                self.timeout
            )),
        }
    }
}
