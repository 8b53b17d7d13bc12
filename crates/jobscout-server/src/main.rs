use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use jobscout_client::{ReqwestFetcher, SelectorParser};
use jobscout_core::{Aggregator, AggregatorConfig, SiteRegistry};
use jobscout_server::routes;
use jobscout_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jobscout=info".parse()?))
        .with_target(false)
        .init();

    let admin_token = std::env::var("JOBSCOUT_ADMIN_TOKEN")
        .ok()
        .filter(|t| !t.is_empty());
    if admin_token.is_none() {
        tracing::warn!("JOBSCOUT_ADMIN_TOKEN not set; /v1 endpoints will answer 403");
    }
    let port = std::env::var("JOBSCOUT_SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let config = AggregatorConfig::from_env()?;
    let sites_file = std::env::var_os("JOBSCOUT_SITES_FILE").map(PathBuf::from);
    let registry = SiteRegistry::from_optional_file(sites_file.as_deref())?;
    let fetcher = ReqwestFetcher::from_config(&config).context("Failed to create HTTP client")?;
    tracing::info!(sites = ?registry.names(), "Loaded site registry");

    let state = Arc::new(AppState {
        aggregator: Aggregator::new(fetcher, SelectorParser, registry, config),
        admin_token,
    });

    let app = routes::router(state)
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
