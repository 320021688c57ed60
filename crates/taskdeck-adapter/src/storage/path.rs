/*
[INPUT]:  Identity, upload timestamp and original file name
[OUTPUT]: Identity-scoped object keys
[POS]:    Storage layer - path scheme `private/{identityId}/uploads/{timestamp}-{filename}`
[UPDATE]: When the object key layout changes
*/

use crate::http::{BackendError, Result};
use crate::types::IdentityId;

pub const PRIVATE_ROOT: &str = "private";
pub const UPLOADS_DIR: &str = "uploads";

/// Prefix holding every upload of `identity`, with trailing slash.
pub fn uploads_prefix(identity: &IdentityId) -> String {
    format!("{PRIVATE_ROOT}/{identity}/{UPLOADS_DIR}/")
}

/// Key for a new upload. Uniqueness relies on the millisecond timestamp only.
pub fn upload_path(identity: &IdentityId, timestamp_millis: i64, file_name: &str) -> String {
    format!("{}{timestamp_millis}-{file_name}", uploads_prefix(identity))
}

/// Identity owning a `private/{identity}/...` key.
pub fn owner_of(path: &str) -> Option<&str> {
    let mut segments = path.split('/');
    match (segments.next(), segments.next()) {
        (Some(PRIVATE_ROOT), Some(owner)) if !owner.is_empty() => Some(owner),
        _ => None,
    }
}

/// Last path segment.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Reject names that would escape the upload prefix.
pub fn validate_file_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(BackendError::Validation("File name cannot be empty".to_string()));
    }
    if name.contains('/') || name == "." || name == ".." {
        return Err(BackendError::Validation(format!("Invalid file name: {name}")));
    }
    Ok(())
}
