use super::errors::GalleryError;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref CONTAINER_NAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
}

pub const DEFAULT_CONTAINER_NAME: &str = "webappstoragedotnet-imagecontainer";

/// Container (bucket) name accepted by both Azure and S3 naming rules.
#[derive(Debug, Clone, Validate)]
pub struct ContainerName {
    #[validate(length(min = 3, max = 63), regex(path = *CONTAINER_NAME_REGEX))]
    pub value: String,
}

impl ContainerName {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let name = Self { value };
        name.validate()?;
        Ok(name)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Default for ContainerName {
    fn default() -> Self {
        Self {
            value: DEFAULT_CONTAINER_NAME.to_string(),
        }
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Name of a blob inside the gallery container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobName(String);

impl BlobName {
    /// Builds a fresh name for an uploaded file.
    ///
    /// Format: `<nanos since epoch, 20 digits>_<uuid v4><.ext>`. Two names can
    /// only collide if both the timestamp and the random id coincide.
    pub fn generate(original_name: &str) -> Self {
        Self::generate_at(original_name, Utc::now(), Uuid::new_v4())
    }

    pub(crate) fn generate_at(original_name: &str, at: DateTime<Utc>, id: Uuid) -> Self {
        let nanos = at.timestamp_nanos_opt().unwrap_or_default().max(0);
        let name = match file_extension(original_name) {
            Some(ext) => format!("{:020}_{}.{}", nanos, id.hyphenated(), ext),
            None => format!("{:020}_{}", nanos, id.hyphenated()),
        };
        Self(name)
    }

    /// Extracts the bare blob name from a full public URI or a plain name.
    ///
    /// Scheme, host, path prefix, query and fragment are discarded and
    /// percent-escapes are decoded.
    pub fn from_name_or_uri(input: &str) -> Result<Self, GalleryError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(GalleryError::InvalidInput("image name is empty".into()));
        }

        let raw_segment = match Url::parse(input) {
            Ok(url) if url.has_host() => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or_default()
                .to_string(),
            _ => input
                .split(['?', '#'])
                .next()
                .and_then(|path| path.rsplit('/').next())
                .unwrap_or_default()
                .to_string(),
        };

        let decoded = urlencoding::decode(&raw_segment)
            .map_err(|_| GalleryError::InvalidInput(format!("invalid encoding in '{}'", input)))?
            .into_owned();

        match decoded.as_str() {
            "" | "." | ".." => Err(GalleryError::InvalidInput(format!(
                "no image name in '{}'",
                input
            ))),
            _ => Ok(Self(decoded)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BlobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercased extension of a client-supplied file name, without the dot.
///
/// Directory components (either separator) are ignored. A name that is only
/// an extension (`.png`) keeps it. Extensions that are not plain ASCII
/// alphanumerics are dropped so generated names stay URL-safe.
pub fn file_extension(original_name: &str) -> Option<String> {
    let file_name = original_name.rsplit(['/', '\\']).next()?;
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// MIME type stored with a blob so browsers render it inline.
pub fn content_type_for(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
