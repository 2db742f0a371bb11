use image_gallery::{
    application::gallery::service::GalleryService,
    config::Config,
    domain::image::errors::GalleryError,
    infrastructure::storage::build_blob_store,
    presentation::http::{routes::create_router, state::AppState},
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Uses RUST_LOG if set, otherwise sensible defaults
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| {
            tracing_subscriber::EnvFilter::try_new("info,image_gallery=debug,tower_http=debug")
        })
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;

    let gallery = match init_gallery(&config).await {
        Ok(gallery) => gallery,
        Err(e) => {
            tracing::error!(trace = ?e.trace(), "Startup aborted: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState {
        gallery: Arc::new(gallery),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "Image gallery listening on {} (container {})",
        addr,
        config.storage_container
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn init_gallery(config: &Config) -> Result<GalleryService, GalleryError> {
    let store = build_blob_store(config)?;
    GalleryService::initialize(
        store,
        config.storage_container.as_str(),
        config.store_timeout,
    )
    .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, initiating graceful shutdown");
        }
    }
}
