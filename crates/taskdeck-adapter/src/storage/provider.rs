/*
[INPUT]:  Object keys, payloads and URL lifetimes
[OUTPUT]: Object metadata, payloads and signed URLs
[POS]:    Storage layer - object store abstraction
[UPDATE]: When adding new object store operations
*/

use std::time::Duration;

use async_trait::async_trait;

use crate::http::Result;
use crate::types::{DownloadedFile, SignedUrl, StoredFile, UploadResult};

/// Remote object store with per-identity private prefixes
///
/// Access policy is enforced by the store: a session may only touch keys
/// under its own `private/{identityId}/` prefix.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, path: &str, data: Vec<u8>, content_type: &str)
    -> Result<UploadResult>;

    async fn get_object(&self, path: &str) -> Result<DownloadedFile>;

    /// Delete by exact key.
    async fn remove_object(&self, path: &str) -> Result<()>;

    /// List every object under `prefix`.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredFile>>;

    /// Temporary signed URL granting read access to `path`.
    async fn signed_url(&self, path: &str, expires_in: Duration) -> Result<SignedUrl>;
}
