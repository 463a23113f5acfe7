use anyhow::Context;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use mood_stylist::{
    config::{Config, API_KEY_VAR},
    routes::{create_router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("{} is not set, generation requests will fail", API_KEY_VAR);
    }
    tracing::info!(gateway = %config.gateway_url, text_model = %config.text_model, image_model = %config.image_model, "Using AI gateway");

    let app = create_router(AppState::from_config(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
