use super::traits::BlobStore;
use crate::domain::image::entity::{StoreEntry, StoredBlob};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::{
    Client, config::BehaviorVersion, config::Credentials, config::Region, primitives::ByteStream,
};
use bytes::Bytes;
use std::fmt;
use tracing::{debug, info, warn};

/// S3-compatible driver (AWS S3, Cloudflare R2, MinIO) bound to one bucket.
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_url: String,
    apply_public_policy: bool,
}

#[derive(Clone)]
pub struct S3Settings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint: String,
    pub region: String,
    pub force_path_style: bool,
    pub public_url: String,
    pub apply_public_policy: bool,
}

impl fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Settings")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("force_path_style", &self.force_path_style)
            .field("public_url", &self.public_url)
            .field("apply_public_policy", &self.apply_public_policy)
            .finish()
    }
}

impl S3BlobStore {
    pub fn new(settings: S3Settings, bucket: String) -> Self {
        let creds = Credentials::new(
            settings.access_key_id,
            settings.secret_access_key,
            None,
            None,
            "image-gallery",
        );
        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(creds)
            .endpoint_url(settings.endpoint)
            .region(Region::new(settings.region))
            .force_path_style(settings.force_path_style)
            .build();

        info!("S3 blob store configured for bucket {}", bucket);

        Self {
            client: Client::from_conf(config),
            bucket,
            public_url: settings.public_url.trim_end_matches('/').to_string(),
            apply_public_policy: settings.apply_public_policy,
        }
    }

    fn public_uri(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, urlencoding::encode(key))
    }

    fn public_read_policy(&self) -> String {
        serde_json::json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Sid": "PublicReadGetObject",
                "Effect": "Allow",
                "Principal": "*",
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{}/*", self.bucket)]
            }]
        })
        .to_string()
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn container_exists(&self) -> anyhow::Result<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(err)
                if err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false) =>
            {
                Ok(false)
            }
            Err(err) => Err(err).with_context(|| format!("check bucket {}", self.bucket)),
        }
    }

    async fn create_container(&self) -> anyhow::Result<()> {
        match self.client.create_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                info!("Created bucket {}", self.bucket);
                Ok(())
            }
            Err(err)
                if err
                    .as_service_error()
                    .map(|e| e.is_bucket_already_owned_by_you())
                    .unwrap_or(false) =>
            {
                debug!("Bucket {} already exists", self.bucket);
                Ok(())
            }
            Err(err) => Err(err).with_context(|| format!("create bucket {}", self.bucket)),
        }
    }

    async fn set_public_access(&self) -> anyhow::Result<()> {
        if !self.apply_public_policy {
            warn!(
                "Skipping bucket policy for {}; public access must be configured at {}",
                self.bucket, self.public_url
            );
            return Ok(());
        }

        self.client
            .put_bucket_policy()
            .bucket(&self.bucket)
            .policy(self.public_read_policy())
            .send()
            .await
            .with_context(|| format!("set public read policy on {}", self.bucket))?;
        Ok(())
    }

    async fn list_entries(&self) -> anyhow::Result<Vec<StoreEntry>> {
        let mut entries = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .delimiter("/")
                .set_continuation_token(continuation.take())
                .send()
                .await
                .with_context(|| format!("list objects in {}", self.bucket))?;

            for object in page.contents() {
                if let Some(key) = object.key() {
                    entries.push(StoreEntry::File(StoredBlob {
                        name: key.to_string(),
                        uri: self.public_uri(key),
                    }));
                }
            }
            for prefix in page.common_prefixes() {
                if let Some(prefix) = prefix.prefix() {
                    entries.push(StoreEntry::VirtualDirectory {
                        prefix: prefix.to_string(),
                    });
                }
            }

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("Listed {} entries in bucket {}", entries.len(), self.bucket);
        Ok(entries)
    }

    async fn put_blob(
        &self,
        name: &str,
        data: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .cache_control("public, max-age=31536000, immutable")
            .send()
            .await
            .with_context(|| format!("put object {}", name))?;
        Ok(self.public_uri(name))
    }

    async fn delete_blob(&self, name: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .with_context(|| format!("delete object {}", name))?;
        Ok(())
    }
}
