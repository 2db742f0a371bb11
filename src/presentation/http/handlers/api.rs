//! JSON API over the same gallery operations as the pages.

use super::upload::read_uploads;
use crate::{
    application::gallery::dto::UploadReport,
    presentation::http::{errors::ApiError, state::AppState},
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Serialize)]
pub struct ImageList {
    pub images: Vec<String>,
    pub count: usize,
}

#[instrument(skip(state))]
pub async fn list_images(State(state): State<AppState>) -> Result<Json<ImageList>, ApiError> {
    let images = state.gallery.list_images().await?;
    Ok(Json(ImageList {
        count: images.len(),
        images,
    }))
}

/// `200` when every file was stored, `207 Multi-Status` otherwise.
#[instrument(skip(state, multipart))]
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadReport>), ApiError> {
    let files = read_uploads(&mut multipart).await?;
    let report = state.gallery.upload_images(files).await;

    let status = if report.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok((status, Json(report)))
}

#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.gallery.delete_image(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_all_images(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.gallery.delete_all_images().await?;
    Ok(StatusCode::NO_CONTENT)
}
