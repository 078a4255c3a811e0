use anyhow::Result;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

pub mod config;
pub mod database;
pub mod http;
pub mod quiz;

use config::{AppConfig, StorageKind};
use database::{DatabaseManager, MemoryStore, QuestionStore};

/// Builds the configured store and serves the HTTP API until Ctrl-C.
pub async fn run(config: AppConfig) -> Result<()> {
    info!("QuizForge starting with {:?} storage", config.storage);

    match config.storage {
        StorageKind::Postgres => {
            let db = Arc::new(DatabaseManager::new(&config.database).await?);
            db.initialize_schema().await?;
            serve(&config, db.clone()).await?;
            db.close();
        }
        StorageKind::Memory => {
            serve(&config, Arc::new(MemoryStore::new())).await?;
        }
    }

    info!("QuizForge stopped");
    Ok(())
}

async fn serve<S: QuestionStore>(config: &AppConfig, store: Arc<S>) -> Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, http::create_app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
