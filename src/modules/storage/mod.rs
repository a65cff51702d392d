//! Blob storage for uploaded file content
//!
//! File bytes live in an opaque key-value store, decoupled from the metadata
//! records. The production backend is MinIO or any S3-compatible service via
//! the rust-s3 crate.

use async_trait::async_trait;

use crate::core::error::Result;

mod minio_store;

pub use minio_store::MinioBlobStore;

/// Opaque byte storage keyed by server-generated storage keys.
///
/// Keys are never exposed to clients; delete is idempotent.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    /// Fails with `NotFound` when no blob exists under the key.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Returns whether a blob existed under the key before the call.
    async fn delete_if_exists(&self, key: &str) -> Result<bool>;
}
