//! HTTP error handling and response conversion.
//!
//! Every failed gallery operation ends up as an [`AppError`]. Page routes
//! render it as the generic error page; the JSON API wraps it in
//! [`ApiError`] and answers with `{ "error": message }` instead. Both log
//! once, at a level derived from the status code.

use super::views;
use crate::{application::gallery::dto::UploadReport, domain::image::errors::GalleryError};
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request (400).
    BadRequest(String),

    /// Request body exceeds the configured limit (413).
    PayloadTooLarge(String),

    /// A gallery operation failed; status follows the error kind.
    Gallery(GalleryError),

    /// Some files of an upload batch were not stored (500).
    PartialUpload(UploadReport),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            Self::Gallery(err) => write!(f, "{}", err),
            Self::PartialUpload(report) => write!(
                f,
                "Upload incomplete: {} of {} files failed",
                report.failed.len(),
                report.attempted()
            ),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Gallery(GalleryError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Gallery(GalleryError::StoreUnavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Gallery(GalleryError::Connection { .. } | GalleryError::Upload { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::PartialUpload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn trace(&self) -> &[String] {
        match self {
            Self::Gallery(err) => err.trace(),
            Self::PartialUpload(report) => report
                .failed
                .first()
                .map(|failed| failed.cause.trace())
                .unwrap_or(&[]),
            Self::BadRequest(_) | Self::PayloadTooLarge(_) => &[],
        }
    }

    fn log(&self, status: StatusCode) {
        match status {
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                tracing::error!(trace = ?self.trace(), "error={}", self);
            }
            StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::warn!("error={}", self);
            }
            _ => {
                tracing::info!("error={}", self);
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        self.log(status);

        let page = match &self {
            Self::PartialUpload(report) => views::upload_failed_page(report),
            _ => views::error_page(&self.to_string(), self.trace()),
        };

        (status, Html(page)).into_response()
    }
}

impl From<GalleryError> for AppError {
    fn from(err: GalleryError) -> Self {
        AppError::Gallery(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}

/// JSON rendition of [`AppError`] for the `/api/v1` routes.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        self.0.log(status);

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<GalleryError> for ApiError {
    fn from(err: GalleryError) -> Self {
        ApiError(AppError::Gallery(err))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError(AppError::from(err))
    }
}
