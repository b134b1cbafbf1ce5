//! Shared application state

use std::sync::Arc;

use casebook_core::Config;
use casebook_db::{CaseStore, DocumentStore};
use casebook_services::{DocumentUploadService, StatsService};
use casebook_storage::Storage;
use sqlx::PgPool;

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub cases: Arc<dyn CaseStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub storage: Arc<dyn Storage>,
    pub uploads: DocumentUploadService,
    pub stats: StatsService,
    pub pool: PgPool,
}
