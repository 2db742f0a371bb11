//! Application configuration loading from environment variables.
//!
//! All configuration is read once at startup via `std::env::var` (a `.env` file is
//! honoured through `dotenvy` in `main`).
//!
//! # Environment Variables
//!
//! ## Storage
//! - `STORAGE_BACKEND`: `azure` (default) or `s3`
//! - `STORAGE_CONTAINER`: container / bucket name (default: "webappstoragedotnet-imagecontainer")
//! - `AZURE_STORAGE_CONNECTION_STRING`: required when the backend is `azure`
//! - `S3_ACCESS_KEY_ID`, `S3_SECRET_ACCESS_KEY`, `S3_ENDPOINT`, `S3_PUBLIC_URL`: required for `s3`
//! - `S3_REGION`: region (default: "auto")
//! - `S3_FORCE_PATH_STYLE`: use path-style URLs (default: false)
//! - `S3_APPLY_PUBLIC_POLICY`: install a public-read bucket policy at startup (default: true)
//! - `STORE_TIMEOUT_SECS`: timeout applied to every store call (default: 30)
//!
//! ## Server
//! - `RUST_LOG`: logging filter (default: "info,image_gallery=debug,tower_http=debug")
//! - `HOST`: bind address (default: "0.0.0.0")
//! - `PORT`: bind port (default: 3000)
//! - `MAX_UPLOAD_BYTES`: request body limit (default: 20 MiB)

use crate::domain::image::value_objects::{ContainerName, DEFAULT_CONTAINER_NAME};
use crate::infrastructure::storage::s3_blob_store::S3Settings;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which remote store the gallery talks to, with its credential.
#[derive(Clone)]
pub enum StorageBackend {
    Azure { connection_string: String },
    S3(S3Settings),
}

impl fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Azure { .. } => f
                .debug_struct("Azure")
                .field("connection_string", &"<redacted>")
                .finish(),
            Self::S3(settings) => f.debug_tuple("S3").field(settings).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendKind {
    Azure,
    S3,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "azure" => Ok(Self::Azure),
            "s3" | "r2" => Ok(Self::S3),
            other => Err(format!("unknown storage backend '{}' (expected azure or s3)", other)),
        }
    }
}

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Remote store and its credential
    pub storage_backend: StorageBackend,

    /// Container holding the gallery images
    pub storage_container: ContainerName,

    /// Upper bound for a single store call
    pub store_timeout: Duration,

    /// Maximum accepted request body, in bytes
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable for the selected backend is
    /// missing, a value cannot be parsed, or the container name is invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let storage_backend = match env_or("STORAGE_BACKEND", BackendKind::Azure)? {
            BackendKind::Azure => StorageBackend::Azure {
                connection_string: env_required("AZURE_STORAGE_CONNECTION_STRING")?,
            },
            BackendKind::S3 => StorageBackend::S3(S3Settings {
                access_key_id: env_required("S3_ACCESS_KEY_ID")?,
                secret_access_key: env_required("S3_SECRET_ACCESS_KEY")?,
                endpoint: env_required("S3_ENDPOINT")?,
                region: env_or("S3_REGION", "auto".to_string())?,
                force_path_style: env_or("S3_FORCE_PATH_STYLE", false)?,
                public_url: env_required("S3_PUBLIC_URL")?,
                apply_public_policy: env_or("S3_APPLY_PUBLIC_POLICY", true)?,
            }),
        };

        let container = env_or("STORAGE_CONTAINER", DEFAULT_CONTAINER_NAME.to_string())?;
        let storage_container = ContainerName::new(container.clone())
            .map_err(|e| anyhow::anyhow!("Invalid STORAGE_CONTAINER '{}': {}", container, e))?;

        Ok(Self {
            host: env_or("HOST", "0.0.0.0".to_string())?,
            port: env_or("PORT", 3000)?,
            storage_backend,
            storage_container,
            store_timeout: Duration::from_secs(env_or("STORE_TIMEOUT_SECS", 30)?),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
        })
    }
}

/// Load a required environment variable.
///
/// # Errors
///
/// Returns an error if the variable is not set.
fn env_required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
