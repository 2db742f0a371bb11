use crate::{
    domain::image::entity::ImageUpload,
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    extract::{Multipart, State},
    response::Redirect,
};
use tracing::{debug, instrument};

/// Collects every multipart part that carries a file name, in submission
/// order. Other form fields are ignored.
pub async fn read_uploads(multipart: &mut Multipart) -> Result<Vec<ImageUpload>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content = field.bytes().await?;
        debug!("Received part {} ({} bytes)", file_name, content.len());
        files.push(ImageUpload::new(file_name, content));
    }

    Ok(files)
}

#[instrument(skip(state, multipart))]
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let files = read_uploads(&mut multipart).await?;
    let report = state.gallery.upload_images(files).await;

    if report.is_complete() {
        Ok(Redirect::to("/"))
    } else {
        Err(AppError::PartialUpload(report))
    }
}
