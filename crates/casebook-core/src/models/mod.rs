//! Domain models
//!
//! Cases, documents, and the derived statistics snapshot.

pub mod case;
pub mod document;
pub mod stats;

pub use case::{Case, CaseDetailResponse, CaseResponse, CaseStatus, CaseSummary, NewCase};
pub use document::{Document, DocumentResponse, DocumentStatus, NewDocument};
pub use stats::StatsSnapshot;
