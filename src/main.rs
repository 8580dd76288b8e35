//! Skin Analysis Service
//!
//! Turns a face photo into skin-health scores via a third-party facial
//! analysis provider and keeps a per-user scan journal. Serves a REST
//! (Axum) API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use dermascan::api::auth::SignedTokenVerifier;
use dermascan::api::rest::{AppState, create_rest_router};
use dermascan::config::Config;
use dermascan::provider::{FaceppGateway, HttpTransport};
use dermascan::service::AnalysisService;
use dermascan::storage::SqliteStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Starting Skin Analysis Service v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = Config::load(Config::default_path()).unwrap_or_else(|e| {
        info!("Using default config ({})", e);
        Config::default()
    });
    config.apply_env_overrides();

    info!("Configuration loaded:");
    info!("  REST port: {}", config.server.port);
    info!("  Provider endpoints: {}", config.provider.endpoints.len());
    info!("  Provider timeout: {}s", config.provider.timeout_secs);

    if config.provider.api_key.is_empty() || config.provider.api_secret.is_empty() {
        warn!("Provider credentials not set; analysis requests will fail until FACEPP_API_KEY and FACEPP_API_SECRET are configured");
    }

    // Initialize storage
    let storage_path = config.storage.sqlite_path.as_deref()
        .map(|p| p.to_str().unwrap())
        .unwrap_or("data/scans.db");

    let storage = Arc::new(SqliteStorage::new(storage_path).await?);
    info!("SQLite storage initialized at: {}", storage_path);

    // Create the provider gateway and the analysis service
    let transport = HttpTransport::new(Duration::from_secs(config.provider.timeout_secs))?;
    let gateway = FaceppGateway::new(transport, config.provider.clone());
    let service = Arc::new(AnalysisService::new(gateway, storage.clone()));

    // Create REST app state
    let verifier = SignedTokenVerifier::new(&config.auth.token_secret);
    let app_state = Arc::new(AppState {
        service: service.clone(),
        verifier: Arc::new(verifier),
        start_time: Instant::now(),
    });

    // Create REST router
    let rest_router = create_rest_router(app_state);

    // Start REST server
    let rest_port = config.server.port;
    let _rest_handle = tokio::spawn(async move {
        let addr = format!("0.0.0.0:{}", rest_port);
        info!("REST API listening on http://{}", addr);

        let listener = TcpListener::bind(&addr).await.unwrap();
        axum::serve(listener, rest_router).await.unwrap();
    });

    info!("Skin Analysis Service is ready!");
    info!("REST: http://localhost:{}/api/health", config.server.port);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, cleaning up...");

    info!("Goodbye!");
    Ok(())
}
