//! Mock store implementations for testing the service layer without a
//! database or real blob storage.

use async_trait::async_trait;
use casebook_core::models::{
    Case, CaseStatus, CaseSummary, Document, DocumentStatus, NewCase, NewDocument,
};
use casebook_core::AppError;
use casebook_db::{CaseStore, DocumentStore};
use casebook_storage::{Storage, StorageBackend, StorageError, StorageResult};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory case store
#[derive(Clone, Default)]
pub struct MockCaseStore {
    cases: Arc<Mutex<HashMap<Uuid, Case>>>,
}

impl MockCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_case(&self, status: CaseStatus) -> Case {
        let case = Case {
            id: Uuid::new_v4(),
            case_number: format!("CV-{}", Uuid::new_v4()),
            title: "Seeded Case".to_string(),
            description: None,
            status,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.cases.lock().unwrap().insert(case.id, case.clone());
        case
    }
}

#[async_trait]
impl CaseStore for MockCaseStore {
    async fn create(&self, new_case: NewCase, created_by: Uuid) -> Result<Case, AppError> {
        let mut cases = self.cases.lock().unwrap();
        if cases
            .values()
            .any(|c| c.case_number == new_case.case_number)
        {
            return Err(AppError::Conflict {
                field: "case_number",
                value: new_case.case_number,
            });
        }
        let case = Case {
            id: Uuid::new_v4(),
            case_number: new_case.case_number,
            title: new_case.title,
            description: new_case.description,
            status: new_case.status,
            created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        cases.insert(case.id, case.clone());
        Ok(case)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Case>, AppError> {
        Ok(self.cases.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Case>, AppError> {
        let mut cases: Vec<Case> = self.cases.lock().unwrap().values().cloned().collect();
        cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cases)
    }

    async fn list_summaries(&self) -> Result<Vec<CaseSummary>, AppError> {
        let mut summaries: Vec<CaseSummary> = self
            .cases
            .lock()
            .unwrap()
            .values()
            .map(|c| CaseSummary {
                id: c.id,
                case_number: c.case_number.clone(),
                title: c.title.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(summaries)
    }

    async fn update_status(&self, id: Uuid, status: CaseStatus) -> Result<Case, AppError> {
        let mut cases = self.cases.lock().unwrap();
        let case = cases
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("case", id))?;
        case.status = status;
        case.updated_at = Utc::now();
        Ok(case.clone())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.cases.lock().unwrap().contains_key(&id))
    }
}

/// In-memory document store with optional insert-failure injection
#[derive(Clone, Default)]
pub struct MockDocumentStore {
    documents: Arc<Mutex<HashMap<Uuid, Document>>>,
    fail_next_insert: Arc<Mutex<bool>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next insert fail, simulating a metadata commit failure after
    /// a successful blob write.
    pub fn fail_next_insert(&self) {
        *self.fail_next_insert.lock().unwrap() = true;
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn insert(&self, new_document: NewDocument) -> Result<Document, AppError> {
        if std::mem::take(&mut *self.fail_next_insert.lock().unwrap()) {
            return Err(AppError::Internal("simulated insert failure".to_string()));
        }
        let document = Document {
            id: Uuid::new_v4(),
            case_id: new_document.case_id,
            title: new_document.title,
            description: new_document.description,
            file_name: new_document.file_name,
            file_path: new_document.file_path,
            file_size: new_document.file_size,
            content_type: new_document.content_type,
            status: new_document.status,
            uploaded_by: new_document.uploaded_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.documents
            .lock()
            .unwrap()
            .insert(document.id, document.clone());
        Ok(document)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        Ok(self.documents.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Document>, AppError> {
        let mut documents: Vec<Document> =
            self.documents.lock().unwrap().values().cloned().collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    async fn list_for_case(&self, case_id: Uuid) -> Result<Vec<Document>, AppError> {
        let mut documents: Vec<Document> = self
            .documents
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.case_id == case_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Document, AppError> {
        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("document", id))?;
        document.status = status;
        document.updated_at = Utc::now();
        Ok(document.clone())
    }
}

/// Recording storage spy with failure injection
#[derive(Clone, Default)]
pub struct SpyStorage {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_puts: Arc<Mutex<bool>>,
    hang_puts: Arc<Mutex<bool>>,
}

impl SpyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_puts(&self) {
        *self.fail_puts.lock().unwrap() = true;
    }

    /// Make puts stall far past any test's write budget, simulating an
    /// unresponsive storage backend.
    pub fn hang_puts(&self) {
        *self.hang_puts.lock().unwrap() = true;
    }

    pub fn put_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.blobs.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl Storage for SpyStorage {
    async fn put(
        &self,
        storage_key: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<()> {
        if *self.fail_puts.lock().unwrap() {
            return Err(StorageError::UploadFailed(
                "simulated storage failure".to_string(),
            ));
        }
        if *self.hang_puts.lock().unwrap() {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        }
        self.blobs
            .lock()
            .unwrap()
            .insert(storage_key.to_string(), data);
        Ok(())
    }

    async fn get(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(storage_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.blobs.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.blobs.lock().unwrap().contains_key(storage_key))
    }

    async fn content_length(&self, storage_key: &str) -> StorageResult<u64> {
        self.blobs
            .lock()
            .unwrap()
            .get(storage_key)
            .map(|d| d.len() as u64)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Contract shared with the real repositories: the store itself enforces
    // case-number uniqueness, not just the insert path that happens to check.
    #[tokio::test]
    async fn test_duplicate_case_number_conflicts_on_second_create() {
        let cases = MockCaseStore::new();
        let first = NewCase::new("CV-2026-001", "Smith v. Jones", None, None).unwrap();
        let second = NewCase::new("CV-2026-001", "Jones v. Smith", None, None).unwrap();

        cases.create(first, Uuid::new_v4()).await.unwrap();
        let err = cases.create(second, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Conflict { field: "case_number", ref value } if value == "CV-2026-001"
        ));
        assert_eq!(cases.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_case_numbers_both_create() {
        let cases = MockCaseStore::new();
        let first = NewCase::new("CV-2026-001", "Smith v. Jones", None, None).unwrap();
        let second = NewCase::new("CV-2026-002", "Jones v. Smith", None, None).unwrap();

        cases.create(first, Uuid::new_v4()).await.unwrap();
        cases.create(second, Uuid::new_v4()).await.unwrap();
        assert_eq!(cases.list().await.unwrap().len(), 2);
    }
}
