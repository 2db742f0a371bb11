use crate::domain::image::entity::StoreEntry;
use async_trait::async_trait;
use bytes::Bytes;

/// Capabilities the gallery needs from a remote object store.
///
/// Every method operates on the single container the driver was built for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn container_exists(&self) -> anyhow::Result<bool>;

    /// Creates the container with blob-level public read access.
    /// Succeeds if another process created it first.
    async fn create_container(&self) -> anyhow::Result<()>;

    /// Sets the container policy so blob contents are readable without credentials.
    async fn set_public_access(&self) -> anyhow::Result<()>;

    /// Lists the entries directly inside the container, all pages materialized.
    async fn list_entries(&self) -> anyhow::Result<Vec<StoreEntry>>;

    /// Writes `data` under `name` and returns the blob's public URI.
    async fn put_blob(&self, name: &str, data: Bytes, content_type: &str)
    -> anyhow::Result<String>;

    /// Deletes `name`. Deleting an absent blob succeeds.
    async fn delete_blob(&self, name: &str) -> anyhow::Result<()>;
}
