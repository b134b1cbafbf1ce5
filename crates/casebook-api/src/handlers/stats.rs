//! Registry statistics handler

use std::sync::Arc;

use axum::{extract::State, Json};
use casebook_core::models::StatsSnapshot;

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Registry-wide counts derived at request time", body = StatsSnapshot),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> Result<Json<StatsSnapshot>, HttpAppError> {
    let snapshot = state.stats.snapshot().await?;
    Ok(Json(snapshot))
}
