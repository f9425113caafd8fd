//! hellostack server
//!
//! Serves the hello endpoint with settings taken from the environment

use anyhow::{Context, Result};
use hellostack::utils::logging::init_logging;
use hellostack::{create_router, version_info, Settings};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("Failed to load server settings")?;

    init_logging(&settings.logging)?;
    info!("{}", version_info());

    if settings.uses_default_secret() {
        warn!("DJANGO_SECRET_KEY is not set; using the insecure development placeholder");
    }
    if settings.security.debug {
        warn!("Debug mode is enabled");
    }
    info!(
        "Database: {}@{}:{}/{} - Cache: {}",
        settings.database.user,
        settings.database.host,
        settings.database.port,
        settings.database.name,
        hellostack::config::settings::redact_url(settings.cache_url())
    );
    info!(
        "Middleware chain: {}",
        settings
            .framework
            .middleware
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app = create_router(settings);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 hellostack server started!");
    info!("📝 Health check: http://{}/health", addr);
    info!("👋 Hello endpoint: http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
