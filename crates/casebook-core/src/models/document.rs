use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Review status of a document. New uploads start as `Draft`; any recognized
/// status may transition to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "document_status", rename_all = "lowercase")
)]
pub enum DocumentStatus {
    Draft,
    Review,
    Final,
    Approved,
    Archived,
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Draft
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Review => "review",
            DocumentStatus::Final => "final",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Archived => "archived",
        };
        f.write_str(s)
    }
}

impl FromStr for DocumentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(DocumentStatus::Draft),
            "review" => Ok(DocumentStatus::Review),
            "final" => Ok(DocumentStatus::Final),
            "approved" => Ok(DocumentStatus::Approved),
            "archived" => Ok(DocumentStatus::Archived),
            other => Err(AppError::validation(
                "status",
                format!(
                    "unrecognized document status '{}' (expected one of: draft, review, final, approved, archived)",
                    other
                ),
            )),
        }
    }
}

/// A committed document record. `file_path` is the storage key of the blob;
/// `file_name` is the sanitized original filename kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Document {
    pub id: Uuid,
    pub case_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub content_type: String,
    pub status: DocumentStatus,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Metadata for a document whose blob has already been written.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub case_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub content_type: String,
    pub status: DocumentStatus,
    pub uploaded_by: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub case_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub file_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_number: Option<String>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            id: doc.id,
            case_id: doc.case_id,
            title: doc.title,
            description: doc.description,
            file_name: doc.file_name,
            file_size: doc.file_size,
            content_type: doc.content_type,
            status: doc.status,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            case_title: None,
            case_number: None,
        }
    }
}

impl DocumentResponse {
    /// Attach the owning case's labels for cross-case listings.
    pub fn with_case(mut self, case_title: &str, case_number: &str) -> Self {
        self.case_title = Some(case_title.to_string());
        self.case_number = Some(case_number.to_string());
        self
    }
}
