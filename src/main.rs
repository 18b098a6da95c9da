use anyhow::Context;
use property_cache::adapters::http;
use property_cache::core::ConfigProvider;
use property_cache::utils::logger;
use property_cache::{Refresher, SanityClient, ServerConfig, SnapshotStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration problems must stop us before a socket is bound.
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logger::init_logger(Default::default());
            tracing::error!(category = ?e.category(), "Configuration error: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    logger::init_logger(config.log_format);
    tracing::info!("Starting property-cache");
    tracing::debug!("Server config: {:?}", config);

    let store = Arc::new(SnapshotStore::new());
    let source = SanityClient::from_config(&config)
        .context("failed to build query API client")?;

    let refresher = Refresher::new(source, Arc::clone(&store), config.refresh_interval())
        .spawn(CancellationToken::new());

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .context("failed to bind to port")?;
    tracing::info!("Server is running on port: {}", config.port());

    let served = http::serve(listener, store, shutdown_signal()).await;

    tracing::info!("Shutting down property refresher");
    refresher.shutdown().await;

    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
