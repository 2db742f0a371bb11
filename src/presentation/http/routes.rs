use super::{
    handlers::{api, gallery, health, upload},
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};
use http::{HeaderValue, header};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    let api_routes = Router::new()
        .route(
            "/api/v1/images",
            get(api::list_images)
                .post(api::upload_images)
                .delete(api::delete_all_images),
        )
        .route("/api/v1/images/{name}", delete(api::delete_image));

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Pages
        .route("/", get(gallery::index))
        .route("/upload", post(upload::upload_images))
        .route("/delete", post(gallery::delete_image))
        .route("/deleteAll", post(gallery::delete_all_images))
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}
