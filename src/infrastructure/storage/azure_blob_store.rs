use super::traits::BlobStore;
use crate::domain::image::entity::{StoreEntry, StoredBlob};
use anyhow::Context;
use async_trait::async_trait;
use azure_core::StatusCode;
use azure_storage::{CloudLocation, ConnectionString};
use azure_storage_blobs::{container::operations::BlobItem, prelude::*};
use bytes::Bytes;
use futures_util::StreamExt;
use std::fmt;
use tracing::{debug, info};

const PUBLIC_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// Azure Blob Storage driver bound to one container.
pub struct AzureBlobStore {
    container_name: String,
    client: ContainerClient,
}

impl fmt::Debug for AzureBlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureBlobStore")
            .field("container_name", &self.container_name)
            .finish()
    }
}

impl AzureBlobStore {
    /// Builds the driver from an Azure storage connection string.
    ///
    /// `UseDevelopmentStorage=true` targets the local emulator. A
    /// `BlobEndpoint` or non-public `EndpointSuffix` selects a custom location.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed or carries no account
    /// name or usable credential.
    pub fn from_connection_string(
        raw: &str,
        container_name: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let container_name = container_name.into();
        let connection =
            ConnectionString::new(raw).context("parse Azure storage connection string")?;

        let builder = if connection.use_development_storage == Some(true) {
            ClientBuilder::emulator()
        } else {
            let account = connection
                .account_name
                .filter(|name| !name.is_empty())
                .context("connection string is missing AccountName")?
                .to_string();
            let credentials = connection
                .storage_credentials()
                .context("connection string has no usable credential")?;
            ClientBuilder::with_location(cloud_location(&connection, account), credentials)
        };
        let client = builder.container_client(&container_name);

        let endpoint = client
            .url()
            .context("build container URI")?
            .to_string();
        info!("Azure blob store configured for {}", endpoint);

        Ok(Self {
            container_name,
            client,
        })
    }

    fn blob_uri(&self, name: &str) -> anyhow::Result<String> {
        let url = self
            .client
            .blob_client(name)
            .url()
            .with_context(|| format!("build URI for blob {}", name))?;
        Ok(url.to_string())
    }
}

fn cloud_location(connection: &ConnectionString<'_>, account: String) -> CloudLocation {
    match (connection.blob_endpoint, connection.endpoint_suffix) {
        (Some(endpoint), _) => CloudLocation::Custom {
            account,
            uri: endpoint.trim_end_matches('/').to_string(),
        },
        (None, Some(suffix)) if !suffix.is_empty() && suffix != PUBLIC_ENDPOINT_SUFFIX => {
            CloudLocation::Custom {
                uri: format!("https://{}.blob.{}", account, suffix),
                account,
            }
        }
        _ => CloudLocation::Public { account },
    }
}

fn has_status(err: &azure_core::Error, status: StatusCode) -> bool {
    err.as_http_error()
        .map(|http| http.status() == status)
        .unwrap_or(false)
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn container_exists(&self) -> anyhow::Result<bool> {
        self.client
            .exists()
            .await
            .with_context(|| format!("check container {}", self.container_name))
    }

    async fn create_container(&self) -> anyhow::Result<()> {
        match self.client.create().public_access(PublicAccess::Blob).await {
            Ok(_) => {
                info!("Created container {}", self.container_name);
                Ok(())
            }
            Err(err) if has_status(&err, StatusCode::Conflict) => {
                debug!("Container {} already exists", self.container_name);
                Ok(())
            }
            Err(err) => {
                Err(err).with_context(|| format!("create container {}", self.container_name))
            }
        }
    }

    async fn set_public_access(&self) -> anyhow::Result<()> {
        self.client
            .set_acl(PublicAccess::Blob)
            .await
            .with_context(|| format!("set public access on {}", self.container_name))?;
        Ok(())
    }

    async fn list_entries(&self) -> anyhow::Result<Vec<StoreEntry>> {
        let mut pages = self.client.list_blobs().delimiter("/").into_stream();
        let mut entries = Vec::new();

        while let Some(page) = pages.next().await {
            let page = page.with_context(|| format!("list blobs in {}", self.container_name))?;
            for item in page.blobs.items {
                match item {
                    BlobItem::Blob(blob) => {
                        let uri = self.blob_uri(&blob.name)?;
                        entries.push(StoreEntry::File(StoredBlob {
                            name: blob.name,
                            uri,
                        }));
                    }
                    BlobItem::BlobPrefix(prefix) => {
                        entries.push(StoreEntry::VirtualDirectory {
                            prefix: prefix.name,
                        });
                    }
                }
            }
        }

        debug!(
            "Listed {} entries in container {}",
            entries.len(),
            self.container_name
        );
        Ok(entries)
    }

    async fn put_blob(
        &self,
        name: &str,
        data: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String> {
        let size = data.len();
        self.client
            .blob_client(name)
            .put_block_blob(data)
            .content_type(content_type.to_string())
            .await
            .with_context(|| format!("put blob {}", name))?;

        debug!("Stored blob {} ({} bytes)", name, size);
        self.blob_uri(name)
    }

    async fn delete_blob(&self, name: &str) -> anyhow::Result<()> {
        match self.client.blob_client(name).delete().await {
            Ok(_) => Ok(()),
            Err(err) if has_status(&err, StatusCode::NotFound) => {
                debug!("Blob {} already absent", name);
                Ok(())
            }
            Err(err) => Err(err).with_context(|| format!("delete blob {}", name)),
        }
    }
}
