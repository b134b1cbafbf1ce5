//! Case registry handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use casebook_core::models::{CaseDetailResponse, CaseResponse, CaseStatus, CaseSummary, NewCase};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCaseRequest {
    pub case_number: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// One of: active, pending, closed. Defaults to pending.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCaseStatusRequest {
    /// One of: active, pending, closed
    pub status: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/cases",
    tag = "cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case created", body = CaseResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Case number already exists", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_case(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseResponse>), HttpAppError> {
    // Status strings are parsed at the boundary so unknown values become 400s
    let status = request
        .status
        .as_deref()
        .map(str::parse::<CaseStatus>)
        .transpose()?;

    let new_case = NewCase::new(
        &request.case_number,
        &request.title,
        request.description,
        status,
    )?;

    let case = state.cases.create(new_case, user.user_id).await?;

    Ok((StatusCode::CREATED, Json(case.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/cases",
    tag = "cases",
    responses(
        (status = 200, description = "All cases, newest first", body = [CaseResponse]),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_cases(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> Result<Json<Vec<CaseResponse>>, HttpAppError> {
    let cases = state.cases.list().await?;
    Ok(Json(cases.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/cases/summaries",
    tag = "cases",
    responses(
        (status = 200, description = "Compact case entries ordered by title", body = [CaseSummary]),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_case_summaries(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> Result<Json<Vec<CaseSummary>>, HttpAppError> {
    let summaries = state.cases.list_summaries().await?;
    Ok(Json(summaries))
}

#[utoipa::path(
    get,
    path = "/api/v1/cases/{id}",
    tag = "cases",
    params(("id" = Uuid, Path, description = "Case id")),
    responses(
        (status = 200, description = "Case with its documents, newest first", body = CaseDetailResponse),
        (status = 404, description = "Case not found", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_case(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CaseDetailResponse>, HttpAppError> {
    let case = state
        .cases
        .get(id)
        .await?
        .ok_or_else(|| casebook_core::AppError::not_found("case", id))?;

    let documents = state.documents.list_for_case(id).await?;

    Ok(Json(CaseDetailResponse {
        case: case.into(),
        documents: documents.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    patch,
    path = "/api/v1/cases/{id}/status",
    tag = "cases",
    params(("id" = Uuid, Path, description = "Case id")),
    request_body = UpdateCaseStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = CaseResponse),
        (status = 400, description = "Unrecognized status", body = ErrorResponse),
        (status = 404, description = "Case not found", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_case_status(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCaseStatusRequest>,
) -> Result<Json<CaseResponse>, HttpAppError> {
    let status = request.status.parse::<CaseStatus>()?;
    let case = state.cases.update_status(id, status).await?;
    Ok(Json(case.into()))
}
