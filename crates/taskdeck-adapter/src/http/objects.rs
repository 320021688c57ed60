/*
[INPUT]:  Object keys, payloads and the held session token
[OUTPUT]: Object metadata, payloads and signed URLs
[POS]:    HTTP layer - object store endpoints (require bearer token)
[UPDATE]: When object store endpoints or payload handling change
*/

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

use crate::http::{BackendClient, Result};
use crate::storage::ObjectStore;
use crate::types::{
    DownloadedFile, ObjectListResponse, SignedUrl, SignedUrlRequest, StoredFile, UploadResult,
};

#[async_trait]
impl ObjectStore for BackendClient {
    /// PUT /v1/objects/{path}
    async fn put_object(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadResult> {
        let builder = self
            .object_request(Method::PUT, path)?
            .header(CONTENT_TYPE, content_type)
            .body(data);
        self.send_json(builder).await
    }

    /// GET /v1/objects/{path}
    async fn get_object(&self, path: &str) -> Result<DownloadedFile> {
        let builder = self.object_request(Method::GET, path)?;
        let (bytes, content_type) = self.send_bytes(builder).await?;
        Ok(DownloadedFile {
            path: path.to_string(),
            bytes,
            content_type,
        })
    }

    /// DELETE /v1/objects/{path}
    async fn remove_object(&self, path: &str) -> Result<()> {
        let builder = self.object_request(Method::DELETE, path)?;
        self.send_empty(builder).await
    }

    /// GET /v1/objects?prefix={prefix}
    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredFile>> {
        let builder = self
            .storage_request(Method::GET, "/v1/objects")?
            .query(&[("prefix", prefix)]);
        let response: ObjectListResponse = self.send_json(builder).await?;
        Ok(response.items)
    }

    /// POST /v1/objects/url
    async fn signed_url(&self, path: &str, expires_in: Duration) -> Result<SignedUrl> {
        let body = SignedUrlRequest {
            path: path.to_string(),
            expires_in: expires_in.as_secs(),
        };
        let builder = self
            .storage_request(Method::POST, "/v1/objects/url")?
            .json(&body);
        self.send_json(builder).await
    }
}
