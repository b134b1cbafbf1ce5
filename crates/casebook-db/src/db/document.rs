use async_trait::async_trait;
use casebook_core::models::{Document, DocumentStatus, NewDocument};
use casebook_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::traits::DocumentStore;

const DOCUMENT_COLUMNS: &str = "id, case_id, title, description, file_name, file_path, \
     file_size, content_type, status, uploaded_by, created_at, updated_at";

/// Repository for managing document metadata
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    /// Commit document metadata. The blob at `file_path` must already exist;
    /// failures here leave the caller holding an orphaned blob.
    #[tracing::instrument(
        skip(self, new_document),
        fields(db.table = "documents", db.operation = "insert", case_id = %new_document.case_id)
    )]
    async fn insert(&self, new_document: NewDocument) -> Result<Document, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            INSERT INTO documents
                (case_id, title, description, file_name, file_path, file_size, content_type, status, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {DOCUMENT_COLUMNS}
            "#,
        ))
        .bind(new_document.case_id)
        .bind(&new_document.title)
        .bind(&new_document.description)
        .bind(&new_document.file_name)
        .bind(&new_document.file_path)
        .bind(new_document.file_size)
        .bind(&new_document.content_type)
        .bind(new_document.status)
        .bind(new_document.uploaded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| crate::db::case::map_unique_violation(e, "file_path", &new_document.file_path))?;

        Ok(document)
    }

    /// Get document by ID
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    /// List all documents, newest first
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    /// List documents for one case, newest first
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select", case_id = %case_id))]
    async fn list_for_case(&self, case_id: Uuid) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE case_id = $1 ORDER BY created_at DESC"
        ))
        .bind(case_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    /// Update document status
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "update", db.record_id = %id))]
    async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Document, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            UPDATE documents SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {DOCUMENT_COLUMNS}
            "#,
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("document", id))?;

        Ok(document)
    }
}
