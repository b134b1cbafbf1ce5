//! Store traits for the service layer.
//!
//! The upload and statistics services orchestrate against these traits rather
//! than concrete repositories, so tests can substitute in-memory stores.

use async_trait::async_trait;
use casebook_core::models::{Case, CaseStatus, CaseSummary, Document, DocumentStatus, NewCase, NewDocument};
use casebook_core::AppError;
use uuid::Uuid;

/// Case registry operations
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Insert a new case. Fails with `Conflict` if the case number is taken.
    async fn create(&self, new_case: NewCase, created_by: Uuid) -> Result<Case, AppError>;

    /// Fetch a case by id
    async fn get(&self, id: Uuid) -> Result<Option<Case>, AppError>;

    /// All cases, newest first
    async fn list(&self) -> Result<Vec<Case>, AppError>;

    /// Compact entries for case pickers, ordered by title
    async fn list_summaries(&self) -> Result<Vec<CaseSummary>, AppError>;

    /// Set the status of a case. Fails with `NotFound` if the case is missing.
    async fn update_status(&self, id: Uuid, status: CaseStatus) -> Result<Case, AppError>;

    /// Check whether a case exists
    async fn exists(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Document registry operations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Commit metadata for a document whose blob is already written
    async fn insert(&self, new_document: NewDocument) -> Result<Document, AppError>;

    /// Fetch a document by id
    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError>;

    /// All documents, newest first
    async fn list(&self) -> Result<Vec<Document>, AppError>;

    /// Documents belonging to one case, newest first
    async fn list_for_case(&self, case_id: Uuid) -> Result<Vec<Document>, AppError>;

    /// Set the status of a document. Fails with `NotFound` if missing.
    async fn update_status(&self, id: Uuid, status: DocumentStatus)
        -> Result<Document, AppError>;
}
