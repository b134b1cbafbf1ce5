//! Casebook Database Library
//!
//! This crate provides the Postgres repositories for cases and documents,
//! plus the store traits the service layer orchestrates against.

pub mod db;
pub mod traits;

// Re-export commonly used types
pub use db::case::CaseRepository;
pub use db::document::DocumentRepository;
pub use traits::{CaseStore, DocumentStore};
