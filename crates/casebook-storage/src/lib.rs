//! Casebook Storage Library
//!
//! This crate provides the blob storage abstraction and implementations for
//! Casebook. It includes the Storage trait and implementations for S3 and the
//! local filesystem.
//!
//! # Storage key format
//!
//! Document blobs are keyed by their owning case:
//!
//! - `{case_id}/{unix_millis}-{sanitized_filename}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use casebook_core::config::StorageBackend;
pub use factory::create_storage;
pub use keys::document_storage_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
