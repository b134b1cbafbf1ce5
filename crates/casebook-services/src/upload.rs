//! Document upload pipeline
//!
//! Orchestrates an upload end to end: validate → derive storage key →
//! blob write (timeout-bounded) → metadata commit. The blob write happens
//! strictly before the metadata commit, so a storage failure leaves no
//! record behind, while a commit failure after a successful write surfaces
//! as `PartialUpload` carrying the orphaned storage key.

use std::sync::Arc;
use std::time::Duration;

use casebook_core::models::{Document, DocumentStatus, NewDocument};
use casebook_core::{sanitize_filename, validation::require_non_empty, AppError};
use casebook_db::{CaseStore, DocumentStore};
use casebook_storage::{document_storage_key, Storage};
use chrono::Utc;
use uuid::Uuid;

/// A validated-enough upload request: raw bytes plus caller-supplied metadata.
#[derive(Debug)]
pub struct UploadRequest {
    pub case_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Initial review status; `None` means the default (`draft`).
    pub status: Option<DocumentStatus>,
    pub original_filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Document upload service
pub struct DocumentUploadService {
    cases: Arc<dyn CaseStore>,
    documents: Arc<dyn DocumentStore>,
    storage: Arc<dyn Storage>,
    storage_write_timeout: Duration,
    max_upload_size_bytes: usize,
}

impl DocumentUploadService {
    pub fn new(
        cases: Arc<dyn CaseStore>,
        documents: Arc<dyn DocumentStore>,
        storage: Arc<dyn Storage>,
        storage_write_timeout: Duration,
        max_upload_size_bytes: usize,
    ) -> Self {
        Self {
            cases,
            documents,
            storage,
            storage_write_timeout,
            max_upload_size_bytes,
        }
    }

    /// Upload a document against a case.
    ///
    /// All validation happens before any write, so a rejected request touches
    /// neither storage nor the database. On `PartialUpload` the blob is left
    /// in place for the caller to clean up or repair; it is never deleted
    /// automatically.
    #[tracing::instrument(
        skip(self, request),
        fields(case_id = %request.case_id, uploaded_by = %uploaded_by)
    )]
    pub async fn upload(
        &self,
        request: UploadRequest,
        uploaded_by: Uuid,
    ) -> Result<Document, AppError> {
        // 1. Validate before touching storage or the database
        let title = require_non_empty("title", &request.title)?;

        if request.data.is_empty() {
            return Err(AppError::validation("file", "file must not be empty"));
        }

        if request.data.len() > self.max_upload_size_bytes {
            return Err(AppError::validation(
                "file",
                format!(
                    "file exceeds maximum allowed size of {} MB",
                    self.max_upload_size_bytes / 1024 / 1024
                ),
            ));
        }

        if !self.cases.exists(request.case_id).await? {
            return Err(AppError::not_found("case", request.case_id));
        }

        let file_name = sanitize_filename(&request.original_filename)?;

        // 2. Derive the storage key and write the blob, bounded by the
        //    configured timeout
        let uploaded_at = Utc::now();
        let storage_key = document_storage_key(request.case_id, uploaded_at, &file_name);
        let file_size = request.data.len() as i64;

        let write = self
            .storage
            .put(&storage_key, &request.content_type, request.data);

        match tokio::time::timeout(self.storage_write_timeout, write).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(error = %e, key = %storage_key, "Blob write failed");
                return Err(AppError::Storage(e.to_string()));
            }
            Err(_) => {
                tracing::error!(key = %storage_key, "Blob write timed out");
                return Err(AppError::Timeout {
                    operation: "blob write",
                    seconds: self.storage_write_timeout.as_secs(),
                });
            }
        }

        // 3. Commit metadata. The blob exists now; a failure here orphans it
        //    and must say so.
        let new_document = NewDocument {
            case_id: request.case_id,
            title,
            description: request
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            file_name,
            file_path: storage_key.clone(),
            file_size,
            content_type: request.content_type,
            status: request.status.unwrap_or_default(),
            uploaded_by,
        };

        let document = self.documents.insert(new_document).await.map_err(|e| {
            tracing::error!(
                error = %e,
                key = %storage_key,
                "Metadata commit failed after blob write; blob is orphaned"
            );
            AppError::PartialUpload {
                storage_key: storage_key.clone(),
                message: e.to_string(),
            }
        })?;

        tracing::info!(
            document_id = %document.id,
            key = %storage_key,
            size_bytes = file_size,
            "Document upload committed"
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockCaseStore, MockDocumentStore, SpyStorage};
    use casebook_core::models::CaseStatus;

    const MAX_UPLOAD: usize = 10 * 1024 * 1024;

    fn service(
        cases: &MockCaseStore,
        documents: &MockDocumentStore,
        storage: &SpyStorage,
    ) -> DocumentUploadService {
        service_with_timeout(cases, documents, storage, Duration::from_secs(30))
    }

    fn service_with_timeout(
        cases: &MockCaseStore,
        documents: &MockDocumentStore,
        storage: &SpyStorage,
        write_timeout: Duration,
    ) -> DocumentUploadService {
        DocumentUploadService::new(
            Arc::new(cases.clone()),
            Arc::new(documents.clone()),
            Arc::new(storage.clone()),
            write_timeout,
            MAX_UPLOAD,
        )
    }

    fn request(case_id: Uuid) -> UploadRequest {
        UploadRequest {
            case_id,
            title: "Motion to Dismiss".to_string(),
            description: None,
            status: None,
            original_filename: "motion (draft)!.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: b"%PDF-1.7 fake".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_upload_commits_blob_then_metadata() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();
        let case = cases.seed_case(CaseStatus::Active);

        let svc = service(&cases, &documents, &storage);
        let uploader = Uuid::new_v4();
        let document = svc.upload(request(case.id), uploader).await.unwrap();

        assert_eq!(document.case_id, case.id);
        assert_eq!(document.uploaded_by, uploader);
        assert_eq!(document.status, DocumentStatus::Draft);
        // Filename is sanitized; the key embeds the case id and filename
        assert_eq!(document.file_name, "motion__draft__.pdf");
        assert!(document.file_path.starts_with(&case.id.to_string()));
        assert!(document.file_path.ends_with("-motion__draft__.pdf"));

        assert_eq!(storage.put_count(), 1);
        assert!(storage.exists(&document.file_path).await.unwrap());
        assert_eq!(documents.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_honors_explicit_status_and_description() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();
        let case = cases.seed_case(CaseStatus::Active);

        let svc = service(&cases, &documents, &storage);
        let mut req = request(case.id);
        req.status = Some(DocumentStatus::Review);
        req.description = Some("  Second draft for partner review  ".to_string());
        let document = svc.upload(req, Uuid::new_v4()).await.unwrap();

        assert_eq!(document.status, DocumentStatus::Review);
        assert_eq!(
            document.description.as_deref(),
            Some("Second draft for partner review")
        );
    }

    #[tokio::test]
    async fn test_missing_case_writes_nothing() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();

        let svc = service(&cases, &documents, &storage);
        let err = svc
            .upload(request(Uuid::new_v4()), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { entity: "case", .. }));
        assert_eq!(storage.put_count(), 0);
        assert_eq!(documents.len(), 0);
    }

    #[tokio::test]
    async fn test_empty_title_rejected_before_any_write() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();
        let case = cases.seed_case(CaseStatus::Active);

        let svc = service(&cases, &documents, &storage);
        let mut req = request(case.id);
        req.title = "   ".to_string();
        let err = svc.upload(req, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(storage.put_count(), 0);
        assert_eq!(documents.len(), 0);
    }

    #[tokio::test]
    async fn test_empty_file_rejected() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();
        let case = cases.seed_case(CaseStatus::Active);

        let svc = service(&cases, &documents, &storage);
        let mut req = request(case.id);
        req.data = Vec::new();
        let err = svc.upload(req, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(storage.put_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_file_rejected() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();
        let case = cases.seed_case(CaseStatus::Active);

        let svc = service(&cases, &documents, &storage);
        let mut req = request(case.id);
        req.data = vec![0u8; MAX_UPLOAD + 1];
        let err = svc.upload(req, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(storage.put_count(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_no_record() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();
        let case = cases.seed_case(CaseStatus::Active);
        storage.fail_puts();

        let svc = service(&cases, &documents, &storage);
        let err = svc.upload(request(case.id), Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(documents.len(), 0);
    }

    #[tokio::test]
    async fn test_slow_blob_write_surfaces_timeout() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();
        let case = cases.seed_case(CaseStatus::Active);
        storage.hang_puts();

        let svc = service_with_timeout(&cases, &documents, &storage, Duration::from_millis(20));
        let err = svc.upload(request(case.id), Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Timeout {
                operation: "blob write",
                ..
            }
        ));
        // The write never completed, so no metadata row was committed.
        assert_eq!(documents.len(), 0);
    }

    #[tokio::test]
    async fn test_metadata_failure_surfaces_partial_upload_with_orphaned_key() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();
        let case = cases.seed_case(CaseStatus::Active);
        documents.fail_next_insert();

        let svc = service(&cases, &documents, &storage);
        let err = svc.upload(request(case.id), Uuid::new_v4()).await.unwrap_err();

        let AppError::PartialUpload { storage_key, .. } = err else {
            panic!("expected PartialUpload, got {err:?}");
        };
        // The orphaned blob is still there; nothing cleaned it up.
        assert!(storage.exists(&storage_key).await.unwrap());
        assert_eq!(storage.keys(), vec![storage_key]);
        assert_eq!(documents.len(), 0);
    }

    #[tokio::test]
    async fn test_case_listing_returns_newest_first() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();
        let case = cases.seed_case(CaseStatus::Active);

        let svc = service(&cases, &documents, &storage);
        let mut uploaded = Vec::new();
        for i in 0..3 {
            let mut req = request(case.id);
            req.title = format!("Exhibit {i}");
            req.original_filename = format!("exhibit-{i}.pdf");
            uploaded.push(svc.upload(req, Uuid::new_v4()).await.unwrap());
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        let listed = documents.list_for_case(case.id).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|d| d.id).collect();
        let expected: Vec<_> = uploaded.iter().rev().map(|d| d.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_path_traversal_filename_rejected() {
        let cases = MockCaseStore::new();
        let documents = MockDocumentStore::new();
        let storage = SpyStorage::new();
        let case = cases.seed_case(CaseStatus::Active);

        let svc = service(&cases, &documents, &storage);
        let mut req = request(case.id);
        req.original_filename = "..".to_string();
        let err = svc.upload(req, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(storage.put_count(), 0);
    }
}
