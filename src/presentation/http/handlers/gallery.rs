use crate::presentation::http::{errors::AppError, state::AppState, views};
use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use serde::Deserialize;
use tracing::{info, instrument};

/// Form body of `POST /delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    /// Public URI or bare blob name
    #[serde(default)]
    name: String,
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let images = state.gallery.list_images().await?;
    Ok(Html(views::gallery_page(&images)))
}

#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect, AppError> {
    state.gallery.delete_image(&form.name).await?;
    Ok(Redirect::to("/"))
}

#[instrument(skip(state))]
pub async fn delete_all_images(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let deleted = state.gallery.delete_all_images().await?;
    info!("Gallery cleared ({} images)", deleted);
    Ok(Redirect::to("/"))
}
