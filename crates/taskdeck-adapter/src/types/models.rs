/*
[INPUT]:  Backend schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - session, identity and stored file models
[UPDATE]: When backend schema changes or new types added
*/

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{SignInStep, SignUpStep};

/// Opaque identity issued by the identity provider; owns a private storage prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInDetails {
    pub login_id: String,
}

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: String,
    pub username: String,
    pub identity_id: IdentityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_in_details: Option<SignInDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CurrentUser {
    /// Login identifier (the email address), falling back to the username.
    pub fn login_id(&self) -> &str {
        self.sign_in_details
            .as_ref()
            .map(|details| details.login_id.as_str())
            .unwrap_or(&self.username)
    }

    pub fn identity(&self) -> &IdentityId {
        &self.identity_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub is_sign_up_complete: bool,
    pub user_id: Option<String>,
    pub next_step: SignUpStep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutcome {
    pub is_signed_in: bool,
    pub next_step: SignInStep,
}

/// Raw object metadata returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub path: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
}

impl StoredFile {
    /// Last path segment, as shown to the user.
    pub fn file_name(&self) -> &str {
        crate::storage::path::file_name(&self.path)
    }
}

/// A listed file with its access URL resolved, if resolution succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl FileEntry {
    pub fn from_stored(file: StoredFile, url: Option<String>) -> Self {
        Self {
            path: file.path,
            size: file.size,
            last_modified: file.last_modified,
            url,
        }
    }

    pub fn file_name(&self) -> &str {
        crate::storage::path::file_name(&self.path)
    }

    /// Size in KiB with one decimal, `None` when the backend omitted it.
    pub fn size_kib(&self) -> Option<f64> {
        self.size.map(|bytes| (bytes as f64 / 1024.0 * 10.0).round() / 10.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub path: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    pub url: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// A file chosen by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a local file; the upload name is the file's base name.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("not a file path: {}", path.display()),
                )
            })?
            .to_string();
        let data = tokio::fs::read(path).await?;
        Ok(Self::new(name, data))
    }

    /// Explicit content type, else one guessed from the extension.
    pub fn content_type(&self) -> String {
        match &self.content_type {
            Some(content_type) => content_type.clone(),
            None => mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_login_id_prefers_sign_in_details() {
        let mut user = CurrentUser {
            user_id: "u-1".to_string(),
            username: "uuid-username".to_string(),
            identity_id: IdentityId::new("eu-west-1:abc"),
            sign_in_details: Some(SignInDetails {
                login_id: "ada@example.com".to_string(),
            }),
            name: None,
        };
        assert_eq!(user.login_id(), "ada@example.com");

        user.sign_in_details = None;
        assert_eq!(user.login_id(), "uuid-username");
    }

    #[test]
    fn test_current_user_deserializes_camel_case() {
        let user: CurrentUser = serde_json::from_value(serde_json::json!({
            "userId": "u-1",
            "username": "ada@example.com",
            "identityId": "id-1",
            "signInDetails": {"loginId": "ada@example.com"}
        }))
        .unwrap();
        assert_eq!(user.identity().as_str(), "id-1");
        assert!(user.name.is_none());
    }

    #[test]
    fn test_file_upload_content_type() {
        let png = FileUpload::new("avatar.png", vec![1, 2, 3]);
        assert_eq!(png.content_type(), "image/png");

        let unknown = FileUpload::new("blob", Vec::new());
        assert_eq!(unknown.content_type(), "application/octet-stream");

        let explicit = FileUpload::new("notes", Vec::new()).with_content_type("text/plain");
        assert_eq!(explicit.content_type(), "text/plain");
    }

    #[test]
    fn test_file_entry_size_kib() {
        let entry = FileEntry {
            path: "private/id/uploads/1-a.png".to_string(),
            size: Some(1536),
            last_modified: None,
            url: None,
        };
        assert_eq!(entry.size_kib(), Some(1.5));
        assert_eq!(entry.file_name(), "1-a.png");
    }
}
