/*
[INPUT]:  Access tokens, expiration and the signed-in user
[OUTPUT]: Token retrieval, expiration status and session snapshots
[POS]:    Auth layer - client-held session lifecycle
[UPDATE]: When adding token refresh or changing storage strategy
*/

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::http::{BackendError, Result};
use crate::types::CurrentUser;

/// Stored session data with metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<CurrentUser>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Thread-safe session holder shared by the HTTP client and services
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    data: Arc<RwLock<Option<SessionData>>>,
}

impl SessionManager {
    /// Create a new empty session manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new access token with expiration
    pub fn set_token(&self, token: String, expires_seconds: u64) {
        let expires_at = Utc::now() + Duration::seconds(expires_seconds as i64);
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(SessionData {
            access_token: token,
            expires_at,
            user: None,
        });
    }

    /// Attach the signed-in user to the current token
    pub fn set_user(&self, user: CurrentUser) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(data) = guard.as_mut() {
            data.user = Some(user);
        }
    }

    /// Get the current token if available
    pub fn access_token(&self) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().map(|data| data.access_token.clone())
    }

    /// Token usable for a request, or the reason there is none
    pub fn valid_token(&self) -> Result<String> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            None => Err(BackendError::NotSignedIn),
            Some(data) if data.is_expired() => Err(BackendError::SessionExpired),
            Some(data) => Ok(data.access_token.clone()),
        }
    }

    /// Check if token is expired (an absent token counts as expired)
    pub fn is_expired(&self) -> bool {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().is_none_or(SessionData::is_expired)
    }

    pub fn is_signed_in(&self) -> bool {
        !self.is_expired()
    }

    /// Cached user, if one was attached
    pub fn user(&self) -> Option<CurrentUser> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().and_then(|data| data.user.clone())
    }

    /// Copy of the session for persistence
    pub fn snapshot(&self) -> Option<SessionData> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Replace the session with a previously saved snapshot
    pub fn restore(&self, data: SessionData) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(data);
    }

    /// Clear the stored session
    pub fn clear(&self) {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IdentityId;

    fn user() -> CurrentUser {
        CurrentUser {
            user_id: "u-1".to_string(),
            username: "ada@example.com".to_string(),
            identity_id: IdentityId::new("id-1"),
            sign_in_details: None,
            name: Some("Ada".to_string()),
        }
    }

    #[test]
    fn test_new_manager_is_empty() {
        let manager = SessionManager::new();
        assert!(manager.access_token().is_none());
        assert!(manager.is_expired());
        assert!(matches!(manager.valid_token(), Err(BackendError::NotSignedIn)));
    }

    #[test]
    fn test_set_and_get_token() {
        let manager = SessionManager::new();
        manager.set_token("token".to_string(), 3600);
        manager.set_user(user());

        assert_eq!(manager.valid_token().unwrap(), "token");
        assert!(manager.is_signed_in());
        assert_eq!(manager.user().map(|u| u.user_id), Some("u-1".to_string()));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let manager = SessionManager::new();
        manager.restore(SessionData {
            access_token: "old".to_string(),
            expires_at: Utc::now() - Duration::seconds(5),
            user: None,
        });
        assert!(matches!(manager.valid_token(), Err(BackendError::SessionExpired)));
    }

    #[test]
    fn test_snapshot_restore_and_clear() {
        let manager = SessionManager::new();
        manager.set_token("token".to_string(), 3600);
        manager.set_user(user());
        let saved = manager.snapshot().unwrap();

        let json = serde_json::to_string(&saved).unwrap();
        let restored = SessionManager::new();
        restored.restore(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.snapshot(), Some(saved));

        restored.clear();
        assert!(restored.snapshot().is_none());
    }
}
