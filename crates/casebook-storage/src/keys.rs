//! Shared key generation for storage backends.
//!
//! Key format: `{case_id}/{unix_millis}-{sanitized_filename}`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate the storage key for a document blob.
///
/// The key prefixes the owning case id so blobs group by case, then a
/// millisecond timestamp so repeated uploads of the same filename never
/// collide. The filename must already be sanitized.
pub fn document_storage_key(case_id: Uuid, uploaded_at: DateTime<Utc>, filename: &str) -> String {
    format!("{}/{}-{}", case_id, uploaded_at.timestamp_millis(), filename)
}
