//! VoiceReader API Server
//!
//! Main entry point for the VoiceReader backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voicereader_api::{AppState, create_router};
use voicereader_core::identity::FirebaseVerifier;
use voicereader_core::storage::{StorageConfig, StorageService};
use voicereader_db::connect_and_migrate;
use voicereader_shared::{AppConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voicereader=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    info!(env = %config.app.env, version = %config.app.api_version, "Configuration loaded");

    let db = connect_and_migrate(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let storage_config = StorageConfig::new(config.storage.clone())
        .with_max_file_size(u64::try_from(config.server.max_upload_bytes).unwrap_or(u64::MAX));
    let storage = StorageService::from_config(storage_config)
        .context("failed to initialize storage")?;
    info!(provider = storage.provider_name(), "Storage service configured");

    let identity = FirebaseVerifier::new(&config.identity);
    info!(project_id = %config.identity.project_id, "Identity verifier configured");

    if config.app.debug_routes {
        warn!("Debug routes are enabled; do not expose this server publicly");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
        storage: Arc::new(storage),
        identity: Arc::new(identity),
        config: Arc::new(config),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
