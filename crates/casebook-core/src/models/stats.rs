use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::case::{Case, CaseStatus};
use crate::models::document::Document;

/// Derived dashboard counters. Always computed from the current registries,
/// never stored, so the numbers are consistent with the lists they were
/// derived from at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatsSnapshot {
    pub total_cases: u64,
    pub active_cases: u64,
    pub total_documents: u64,
    /// Documents created within the recency window ending at the snapshot time.
    pub recent_documents: u64,
}

impl StatsSnapshot {
    /// Compute a snapshot over the given registries. `now` anchors the
    /// recency window so callers (and tests) control the clock.
    pub fn compute(
        cases: &[Case],
        documents: &[Document],
        now: DateTime<Utc>,
        window_days: i64,
    ) -> Self {
        let window_start = now - Duration::days(window_days);
        StatsSnapshot {
            total_cases: cases.len() as u64,
            active_cases: cases
                .iter()
                .filter(|c| c.status == CaseStatus::Active)
                .count() as u64,
            total_documents: documents.len() as u64,
            recent_documents: documents
                .iter()
                .filter(|d| d.created_at > window_start)
                .count() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentStatus;
    use uuid::Uuid;

    fn case_with_status(status: CaseStatus) -> Case {
        Case {
            id: Uuid::new_v4(),
            case_number: format!("CV-{}", Uuid::new_v4()),
            title: "Test Case".to_string(),
            description: None,
            status,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn document_created_at(created_at: DateTime<Utc>) -> Document {
        Document {
            id: Uuid::new_v4(),
            case_id: Uuid::new_v4(),
            title: "Doc".to_string(),
            description: None,
            file_name: "doc.pdf".to_string(),
            file_path: format!("{}/doc.pdf", Uuid::new_v4()),
            file_size: 100,
            content_type: "application/pdf".to_string(),
            status: DocumentStatus::Draft,
            uploaded_by: Uuid::new_v4(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_compute_counts() {
        let now = Utc::now();
        let cases = vec![
            case_with_status(CaseStatus::Active),
            case_with_status(CaseStatus::Active),
            case_with_status(CaseStatus::Closed),
        ];
        let documents = vec![
            document_created_at(now - Duration::hours(1)),
            document_created_at(now - Duration::days(3)),
            document_created_at(now - Duration::days(10)),
            document_created_at(now - Duration::days(8)),
            document_created_at(now - Duration::days(30)),
        ];

        let snapshot = StatsSnapshot::compute(&cases, &documents, now, 7);

        assert_eq!(snapshot.total_cases, 3);
        assert_eq!(snapshot.active_cases, 2);
        assert_eq!(snapshot.total_documents, 5);
        assert_eq!(snapshot.recent_documents, 2);
    }

    #[test]
    fn test_compute_empty_registries() {
        let snapshot = StatsSnapshot::compute(&[], &[], Utc::now(), 7);
        assert_eq!(
            snapshot,
            StatsSnapshot {
                total_cases: 0,
                active_cases: 0,
                total_documents: 0,
                recent_documents: 0,
            }
        );
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let now = Utc::now();
        // A document aged exactly one window is no longer recent; one created
        // a second inside the window still is.
        let documents = vec![
            document_created_at(now - Duration::days(7)),
            document_created_at(now - Duration::days(7) + Duration::seconds(1)),
        ];
        let snapshot = StatsSnapshot::compute(&[], &documents, now, 7);
        assert_eq!(snapshot.recent_documents, 1);
    }

    #[test]
    fn test_pending_cases_are_not_active() {
        let now = Utc::now();
        let cases = vec![case_with_status(CaseStatus::Pending)];
        let snapshot = StatsSnapshot::compute(&cases, &[], now, 7);
        assert_eq!(snapshot.total_cases, 1);
        assert_eq!(snapshot.active_cases, 0);
    }
}
