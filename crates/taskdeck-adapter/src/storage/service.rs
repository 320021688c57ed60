/*
[INPUT]:  Object store implementation, explicit identity, chosen files
[OUTPUT]: Stored file metadata, payloads and resolved access URLs
[POS]:    Storage layer - object storage service used by the view containers
[UPDATE]: When storage operations or their error policy change
*/

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{error, info, warn};

use crate::http::Result;
use crate::types::{DownloadedFile, FileEntry, FileUpload, IdentityId, StoredFile, UploadResult};

use super::ObjectStore;
use super::path::{upload_path, uploads_prefix, validate_file_name};

/// Default lifetime of resolved access URLs
pub const DEFAULT_URL_EXPIRES_IN: Duration = Duration::from_secs(900);

/// Object storage service. Every path is built from an explicit identity.
#[derive(Clone)]
pub struct StorageService {
    store: Arc<dyn ObjectStore>,
    url_expires_in: Duration,
}

impl std::fmt::Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService")
            .field("url_expires_in", &self.url_expires_in)
            .finish_non_exhaustive()
    }
}

impl StorageService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            url_expires_in: DEFAULT_URL_EXPIRES_IN,
        }
    }

    pub fn with_url_expires_in(mut self, expires_in: Duration) -> Self {
        self.url_expires_in = expires_in;
        self
    }

    /// Upload under `private/{identity}/uploads/{now_millis}-{name}`.
    pub async fn upload_file(&self, identity: &IdentityId, file: FileUpload) -> Result<UploadResult> {
        self.upload_file_at(identity, file, Utc::now().timestamp_millis())
            .await
    }

    /// Upload with an explicit timestamp component.
    pub async fn upload_file_at(
        &self,
        identity: &IdentityId,
        file: FileUpload,
        timestamp_millis: i64,
    ) -> Result<UploadResult> {
        validate_file_name(&file.name).inspect_err(|err| error!(error = %err, "upload file error"))?;

        let path = upload_path(identity, timestamp_millis, &file.name);
        let content_type = file.content_type();
        let size = file.data.len();
        match self.store.put_object(&path, file.data, &content_type).await {
            Ok(result) => {
                info!(path = %result.path, size, content_type = %content_type, "file uploaded");
                Ok(result)
            }
            Err(err) => {
                error!(path = %path, error = %err, "upload file error");
                Err(err)
            }
        }
    }

    /// Download `name` from the identity's upload prefix.
    pub async fn download_file(&self, identity: &IdentityId, name: &str) -> Result<DownloadedFile> {
        let path = format!("{}{name}", uploads_prefix(identity));
        self.store
            .get_object(&path)
            .await
            .inspect_err(|err| error!(path = %path, error = %err, "download file error"))
    }

    /// Delete by full key.
    pub async fn delete_file(&self, path: &str) -> Result<()> {
        self.store
            .remove_object(path)
            .await
            .inspect(|_| info!(path, "file deleted"))
            .inspect_err(|err| error!(path, error = %err, "delete file error"))
    }

    /// Time-limited access URL for a full key.
    pub async fn get_file_url(&self, path: &str) -> Result<String> {
        self.store
            .signed_url(path, self.url_expires_in)
            .await
            .map(|signed| signed.url)
            .inspect_err(|err| error!(path, error = %err, "get file URL error"))
    }

    /// Raw metadata of every upload owned by `identity`.
    pub async fn list_files(&self, identity: &IdentityId) -> Result<Vec<StoredFile>> {
        let prefix = uploads_prefix(identity);
        self.store
            .list_objects(&prefix)
            .await
            .inspect_err(|err| error!(prefix = %prefix, error = %err, "list files error"))
    }

    /// Resolve URLs for a listing concurrently, keeping input order.
    ///
    /// A failed resolution degrades that entry to `url: None`; the batch never fails.
    pub async fn resolve_urls(&self, files: Vec<StoredFile>) -> Vec<FileEntry> {
        let lookups = files.into_iter().map(|file| async move {
            match self.get_file_url(&file.path).await {
                Ok(url) => FileEntry::from_stored(file, Some(url)),
                Err(err) => {
                    warn!(path = %file.path, error = %err, "URL unavailable");
                    FileEntry::from_stored(file, None)
                }
            }
        });
        join_all(lookups).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::BackendError;
    use crate::memory::InMemoryBackend;

    async fn signed_in(backend: &InMemoryBackend, email: &str) -> IdentityId {
        backend.register_confirmed(email, "pw", "Tester").await;
        backend.sign_in_as(email).await.unwrap().identity_id
    }

    #[tokio::test]
    async fn test_upload_path_and_listing() {
        let backend = InMemoryBackend::new();
        let identity = signed_in(&backend, "ada@example.com").await;
        let storage = StorageService::new(Arc::new(backend.clone()));

        let result = storage
            .upload_file_at(&identity, FileUpload::new("f.txt", b"hi".to_vec()), 42)
            .await
            .unwrap();
        assert_eq!(result.path, format!("private/{identity}/uploads/42-f.txt"));

        let files = storage.list_files(&identity).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, result.path);
        assert_eq!(files[0].size, Some(2));
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_name_without_remote_call() {
        let backend = InMemoryBackend::new();
        let identity = signed_in(&backend, "ada@example.com").await;
        let storage = StorageService::new(Arc::new(backend.clone()));

        let err = storage
            .upload_file(&identity, FileUpload::new("../x", Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Validation(_)));
        assert_eq!(backend.object_count().await, 0);
    }

    #[tokio::test]
    async fn test_resolve_urls_degrades_single_failure() {
        let backend = InMemoryBackend::new();
        let identity = signed_in(&backend, "ada@example.com").await;
        let storage = StorageService::new(Arc::new(backend.clone()));

        for (ts, name) in [(1, "a.png"), (2, "b.png"), (3, "c.png")] {
            storage
                .upload_file_at(&identity, FileUpload::new(name, vec![0u8; 8]), ts)
                .await
                .unwrap();
        }
        let broken = upload_path(&identity, 2, "b.png");
        backend.fail_url_for(&broken).await;

        let files = storage.list_files(&identity).await.unwrap();
        let entries = storage.resolve_urls(files).await;

        assert_eq!(entries.len(), 3);
        let missing: Vec<_> = entries.iter().filter(|e| e.url.is_none()).collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].path, broken);
        assert_eq!(entries[0].file_name(), "1-a.png");
    }

    #[tokio::test]
    async fn test_download_file_by_name() {
        let backend = InMemoryBackend::new();
        let identity = signed_in(&backend, "ada@example.com").await;
        let storage = StorageService::new(Arc::new(backend.clone()));

        storage
            .upload_file_at(&identity, FileUpload::new("notes.txt", b"hello".to_vec()), 7)
            .await
            .unwrap();
        let file = storage.download_file(&identity, "7-notes.txt").await.unwrap();
        assert_eq!(file.bytes, b"hello");
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
    }
}
