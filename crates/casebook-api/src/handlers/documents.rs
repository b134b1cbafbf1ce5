//! Document registry handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use casebook_core::models::{DocumentResponse, DocumentStatus};
use casebook_core::AppError;
use casebook_services::UploadRequest;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDocumentStatusRequest {
    /// One of: draft, review, final, approved, archived
    pub status: String,
}

/// The decoded multipart upload form. `description` and `status` are optional.
struct UploadForm {
    case_id: Uuid,
    title: String,
    description: Option<String>,
    status: Option<DocumentStatus>,
    original_filename: String,
    content_type: String,
    data: Vec<u8>,
}

/// Extract the upload form from multipart: a single "file" field plus
/// "case_id" and "title" text fields, with optional "description" and "status".
async fn extract_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut case_id: Option<String> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut status: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation("body", format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if file_data.is_some() {
                    return Err(AppError::validation(
                        "file",
                        "Multiple file fields are not allowed; send exactly one field named 'file'",
                    ));
                }
                filename = field.file_name().map(|s: &str| s.to_string());
                content_type = field.content_type().map(|s: &str| s.to_string());

                let data = field.bytes().await.map_err(|e| {
                    AppError::validation("file", format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
            }
            "case_id" => {
                case_id = Some(field.text().await.map_err(|e| {
                    AppError::validation("case_id", format!("Failed to read field: {}", e))
                })?);
            }
            "title" => {
                title = Some(field.text().await.map_err(|e| {
                    AppError::validation("title", format!("Failed to read field: {}", e))
                })?);
            }
            "description" => {
                description = Some(field.text().await.map_err(|e| {
                    AppError::validation("description", format!("Failed to read field: {}", e))
                })?);
            }
            "status" => {
                status = Some(field.text().await.map_err(|e| {
                    AppError::validation("status", format!("Failed to read field: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let file_data = file_data.ok_or_else(|| AppError::validation("file", "No file provided"))?;
    let case_id = case_id
        .ok_or_else(|| AppError::validation("case_id", "No case_id provided"))?
        .parse::<Uuid>()
        .map_err(|_| AppError::validation("case_id", "case_id is not a valid UUID"))?;
    let title = title.ok_or_else(|| AppError::validation("title", "No title provided"))?;

    // Status strings are parsed here so unrecognized values become 400s
    let status = status
        .as_deref()
        .map(str::parse::<DocumentStatus>)
        .transpose()?;

    let original_filename = filename.unwrap_or_else(|| "unknown".to_string());
    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(UploadForm {
        case_id,
        title,
        description,
        status,
        original_filename,
        content_type,
        data: file_data,
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document uploaded and committed", body = DocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Case not found", body = ErrorResponse),
        (status = 500, description = "Partial upload: blob written, metadata commit failed", body = ErrorResponse),
        (status = 502, description = "Blob storage failure", body = ErrorResponse),
        (status = 504, description = "Blob write timed out", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>), HttpAppError> {
    let form = extract_upload_form(multipart).await?;

    let document = state
        .uploads
        .upload(
            UploadRequest {
                case_id: form.case_id,
                title: form.title,
                description: form.description,
                status: form.status,
                original_filename: form.original_filename,
                content_type: form.content_type,
                data: form.data,
            },
            user.user_id,
        )
        .await?;

    // The committed document carries its case's labels for immediate display
    let case_id = document.case_id;
    let mut response = DocumentResponse::from(document);
    if let Some(case) = state.cases.get(case_id).await? {
        response = response.with_case(&case.title, &case.case_number);
    }

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents",
    tag = "documents",
    responses(
        (status = 200, description = "All documents, newest first, with case labels", body = [DocumentResponse]),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> Result<Json<Vec<DocumentResponse>>, HttpAppError> {
    let documents = state.documents.list().await?;

    // Cross-case listing carries the owning case's labels
    let cases = state.cases.list().await?;
    let labels: HashMap<Uuid, (String, String)> = cases
        .into_iter()
        .map(|c| (c.id, (c.title, c.case_number)))
        .collect();

    let responses = documents
        .into_iter()
        .map(|doc| {
            let case_id = doc.case_id;
            let response = DocumentResponse::from(doc);
            match labels.get(&case_id) {
                Some((title, number)) => response.with_case(title, number),
                None => response,
            }
        })
        .collect();

    Ok(Json(responses))
}

#[utoipa::path(
    patch,
    path = "/api/v1/documents/{id}/status",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    request_body = UpdateDocumentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = DocumentResponse),
        (status = 400, description = "Unrecognized status", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_document_status(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateDocumentStatusRequest>,
) -> Result<Json<DocumentResponse>, HttpAppError> {
    let status = request.status.parse::<DocumentStatus>()?;
    let document = state.documents.update_status(id, status).await?;
    Ok(Json(document.into()))
}
