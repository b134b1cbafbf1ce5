use async_trait::async_trait;
use casebook_core::models::{Case, CaseStatus, CaseSummary, NewCase};
use casebook_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::traits::CaseStore;

const CASE_COLUMNS: &str =
    "id, case_number, title, description, status, created_by, created_at, updated_at";

/// Map a unique-constraint violation to `Conflict`; everything else stays a
/// database error. The pre-insert duplicate check covers the common path, this
/// covers racing writers.
pub(crate) fn map_unique_violation(err: sqlx::Error, field: &'static str, value: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return AppError::Conflict {
                field,
                value: value.to_string(),
            };
        }
    }
    AppError::Database(err)
}

/// Repository for managing cases
#[derive(Clone)]
pub struct CaseRepository {
    pool: PgPool,
}

impl CaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaseStore for CaseRepository {
    /// Create a new case
    #[tracing::instrument(skip(self, new_case), fields(db.table = "cases", db.operation = "insert"))]
    async fn create(&self, new_case: NewCase, created_by: Uuid) -> Result<Case, AppError> {
        // Check for duplicate case number
        let duplicate_exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM cases WHERE case_number = $1)",
        )
        .bind(&new_case.case_number)
        .fetch_one(&self.pool)
        .await?;

        if duplicate_exists {
            return Err(AppError::Conflict {
                field: "case_number",
                value: new_case.case_number,
            });
        }

        let case = sqlx::query_as::<Postgres, Case>(&format!(
            r#"
            INSERT INTO cases (case_number, title, description, status, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CASE_COLUMNS}
            "#,
        ))
        .bind(&new_case.case_number)
        .bind(&new_case.title)
        .bind(&new_case.description)
        .bind(new_case.status)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "case_number", &new_case.case_number))?;

        Ok(case)
    }

    /// Get case by ID
    #[tracing::instrument(skip(self), fields(db.table = "cases", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Case>, AppError> {
        let case = sqlx::query_as::<Postgres, Case>(&format!(
            "SELECT {CASE_COLUMNS} FROM cases WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(case)
    }

    /// List all cases, newest first
    #[tracing::instrument(skip(self), fields(db.table = "cases", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<Case>, AppError> {
        let cases = sqlx::query_as::<Postgres, Case>(&format!(
            "SELECT {CASE_COLUMNS} FROM cases ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(cases)
    }

    /// List compact case entries for pickers, ordered by title
    #[tracing::instrument(skip(self), fields(db.table = "cases", db.operation = "select"))]
    async fn list_summaries(&self) -> Result<Vec<CaseSummary>, AppError> {
        let summaries = sqlx::query_as::<Postgres, CaseSummary>(
            "SELECT id, case_number, title FROM cases ORDER BY title ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Update case status
    #[tracing::instrument(skip(self), fields(db.table = "cases", db.operation = "update", db.record_id = %id))]
    async fn update_status(&self, id: Uuid, status: CaseStatus) -> Result<Case, AppError> {
        let case = sqlx::query_as::<Postgres, Case>(&format!(
            r#"
            UPDATE cases SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {CASE_COLUMNS}
            "#,
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("case", id))?;

        Ok(case)
    }

    /// Check if a case exists
    #[tracing::instrument(skip(self), fields(db.table = "cases", db.operation = "select", db.record_id = %id))]
    async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<Postgres, bool>("SELECT EXISTS(SELECT 1 FROM cases WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    /// Minimal database error carrying a SQLSTATE code, standing in for the
    /// errors Postgres raises on constraint violations.
    #[derive(Debug)]
    struct ConstraintError {
        code: &'static str,
    }

    impl fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "constraint violation (SQLSTATE {})", self.code)
        }
    }

    impl StdError for ConstraintError {}

    impl sqlx::error::DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            "constraint violation"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.code == "23505" {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = sqlx::Error::Database(Box::new(ConstraintError { code: "23505" }));
        let mapped = map_unique_violation(err, "case_number", "CV-2026-001");

        assert!(matches!(
            mapped,
            AppError::Conflict { field: "case_number", ref value } if value == "CV-2026-001"
        ));
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        // Foreign-key violation (23503) is not a duplicate; it stays a
        // database error.
        let err = sqlx::Error::Database(Box::new(ConstraintError { code: "23503" }));
        let mapped = map_unique_violation(err, "case_number", "CV-2026-001");
        assert!(matches!(mapped, AppError::Database(_)));
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        let mapped = map_unique_violation(sqlx::Error::RowNotFound, "case_number", "CV-2026-001");
        assert!(matches!(mapped, AppError::Database(_)));
    }
}
