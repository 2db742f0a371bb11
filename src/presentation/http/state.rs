use crate::{application::gallery::service::GalleryService, config::Config};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gallery: Arc<GalleryService>,
    pub config: Config,
}
