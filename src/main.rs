//! Article server - Binary Entry Point

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use article_vault::api::{create_router, AppState};
use article_vault::types::ServerResult;
use article_vault::AppConfig;

#[tokio::main]
async fn main() -> ServerResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        version = article_vault::VERSION,
        "article server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("article server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
