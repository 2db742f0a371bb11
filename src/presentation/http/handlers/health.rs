use crate::presentation::http::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    storage: &'static str,
    version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage_status = match state.gallery.check_store().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            "down"
        }
    };

    let status = if storage_status == "up" {
        "healthy"
    } else {
        "unhealthy"
    };

    let response = HealthResponse {
        status,
        storage: storage_status,
        version: env!("CARGO_PKG_VERSION"),
    };

    let code = if status == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}
