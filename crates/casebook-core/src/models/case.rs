use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::document::DocumentResponse;

/// Lifecycle status of a case. Any recognized status may transition to any
/// other; membership in this set is the only constraint enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "case_status", rename_all = "lowercase")
)]
pub enum CaseStatus {
    Active,
    Pending,
    Closed,
}

impl Default for CaseStatus {
    fn default() -> Self {
        CaseStatus::Pending
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseStatus::Active => "active",
            CaseStatus::Pending => "pending",
            CaseStatus::Closed => "closed",
        };
        f.write_str(s)
    }
}

impl FromStr for CaseStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CaseStatus::Active),
            "pending" => Ok(CaseStatus::Pending),
            "closed" => Ok(CaseStatus::Closed),
            other => Err(AppError::validation(
                "status",
                format!(
                    "unrecognized case status '{}' (expected one of: active, pending, closed)",
                    other
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Case {
    pub id: Uuid,
    pub case_number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: CaseStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for case creation. Construction enforces the non-empty
/// field invariants, so a `NewCase` is always insertable.
#[derive(Debug, Clone)]
pub struct NewCase {
    pub case_number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: CaseStatus,
}

impl NewCase {
    pub fn new(
        case_number: &str,
        title: &str,
        description: Option<String>,
        status: Option<CaseStatus>,
    ) -> Result<Self, AppError> {
        Ok(NewCase {
            case_number: crate::validation::require_non_empty("case_number", case_number)?,
            title: crate::validation::require_non_empty("title", title)?,
            description: description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
            status: status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaseResponse {
    pub id: Uuid,
    pub case_number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Case> for CaseResponse {
    fn from(case: Case) -> Self {
        CaseResponse {
            id: case.id,
            case_number: case.case_number,
            title: case.title,
            description: case.description,
            status: case.status,
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }
}

/// Compact listing entry for pickers: id and labels only.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CaseSummary {
    pub id: Uuid,
    pub case_number: String,
    pub title: String,
}

/// A case together with its documents, newest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct CaseDetailResponse {
    #[serde(flatten)]
    pub case: CaseResponse,
    pub documents: Vec<DocumentResponse>,
}
