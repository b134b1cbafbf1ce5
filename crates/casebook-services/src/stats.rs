//! Derived statistics
//!
//! Reads both registries and computes the dashboard snapshot in one pass.
//! Nothing is cached; every call reflects the registries as they are now.

use std::sync::Arc;

use casebook_core::models::StatsSnapshot;
use casebook_core::AppError;
use casebook_db::{CaseStore, DocumentStore};
use chrono::Utc;

/// Statistics service
pub struct StatsService {
    cases: Arc<dyn CaseStore>,
    documents: Arc<dyn DocumentStore>,
    recent_window_days: i64,
}

impl StatsService {
    pub fn new(
        cases: Arc<dyn CaseStore>,
        documents: Arc<dyn DocumentStore>,
        recent_window_days: i64,
    ) -> Self {
        Self {
            cases,
            documents,
            recent_window_days,
        }
    }

    /// Compute the current snapshot from one read of each registry.
    #[tracing::instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<StatsSnapshot, AppError> {
        let cases = self.cases.list().await?;
        let documents = self.documents.list().await?;

        Ok(StatsSnapshot::compute(
            &cases,
            &documents,
            Utc::now(),
            self.recent_window_days,
        ))
    }
}
