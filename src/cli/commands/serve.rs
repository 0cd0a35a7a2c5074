use std::sync::Arc;

use anyhow::{bail, Context};

use crate::app::{app, AppState};
use crate::config::{config, AppConfig, StoreBackend};
use crate::database::{DatabaseManager, MemoryStore, PgStore, SharedStore};

/// Build the configured store. Postgres needs `DATABASE_URL`.
pub async fn build_store(config: &AppConfig) -> anyhow::Result<SharedStore> {
    match config.database.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let manager = DatabaseManager::connect(&config.database)
                .await
                .context("connecting to Postgres")?;
            Ok(Arc::new(PgStore::new(&manager)))
        }
    }
}

pub async fn handle() -> anyhow::Result<()> {
    let config = config();
    tracing::info!("Starting portal API in {:?} mode", config.environment);

    if crate::is_production!() && config.database.backend == StoreBackend::Memory {
        bail!("the in-memory store is not allowed in production");
    }
    if config.security.session_secret.is_empty() {
        tracing::warn!("SESSION_JWT_SECRET is not set; every session will be rejected");
    }

    let store = build_store(config).await?;
    let state = AppState::new(store, config.clone());

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Portal API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
