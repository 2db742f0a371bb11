use thiserror::Error;

/// Failures of the gallery operations.
///
/// Store drivers report `anyhow` errors; they are flattened here into a
/// message plus the formatted source chain so the HTTP boundary can show a
/// diagnostic trace without holding on to driver types.
#[derive(Debug, Clone, Error)]
pub enum GalleryError {
    #[error("Could not connect to blob storage: {message}")]
    Connection { message: String, trace: Vec<String> },

    #[error("Blob storage unavailable: {message}")]
    StoreUnavailable { message: String, trace: Vec<String> },

    #[error("Failed to upload {file_name}: {message}")]
    Upload {
        file_name: String,
        message: String,
        trace: Vec<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GalleryError {
    pub fn connection(err: &anyhow::Error) -> Self {
        Self::Connection {
            message: err.to_string(),
            trace: error_chain(err),
        }
    }

    pub fn store_unavailable(err: &anyhow::Error) -> Self {
        Self::StoreUnavailable {
            message: err.to_string(),
            trace: error_chain(err),
        }
    }

    pub fn upload(file_name: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::Upload {
            file_name: file_name.into(),
            message: err.to_string(),
            trace: error_chain(err),
        }
    }

    /// Source chain of the underlying failure, outermost first.
    pub fn trace(&self) -> &[String] {
        match self {
            Self::Connection { trace, .. }
            | Self::StoreUnavailable { trace, .. }
            | Self::Upload { trace, .. } => trace,
            Self::InvalidInput(_) => &[],
        }
    }
}

fn error_chain(err: &anyhow::Error) -> Vec<String> {
    err.chain().map(|cause| cause.to_string()).collect()
}
