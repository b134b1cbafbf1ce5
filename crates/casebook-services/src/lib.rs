//! Casebook Services Library
//!
//! Orchestration layer between the HTTP surface and the stores: the document
//! upload pipeline (blob write then metadata commit) and derived statistics.

pub mod stats;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use stats::StatsService;
pub use upload::{DocumentUploadService, UploadRequest};
