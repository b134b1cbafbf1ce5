//! Application setup and initialization
//!
//! All startup wiring lives here so main.rs stays a thin entry point.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use casebook_core::Config;
use casebook_db::{CaseRepository, CaseStore, DocumentRepository, DocumentStore};
use casebook_services::{DocumentUploadService, StatsService};
use casebook_storage::create_storage;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize blob storage")?;

    let cases: Arc<dyn CaseStore> = Arc::new(CaseRepository::new(pool.clone()));
    let documents: Arc<dyn DocumentStore> = Arc::new(DocumentRepository::new(pool.clone()));

    let uploads = DocumentUploadService::new(
        cases.clone(),
        documents.clone(),
        storage.clone(),
        Duration::from_secs(config.storage_write_timeout_seconds),
        config.max_upload_size_bytes,
    );
    let stats = StatsService::new(
        cases.clone(),
        documents.clone(),
        config.recent_document_window_days,
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        cases,
        documents,
        storage,
        uploads,
        stats,
        pool,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
