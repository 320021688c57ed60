/*
[INPUT]:  Error sources (HTTP, backend API, serialization, session, validation)
[OUTPUT]: Structured error types with context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for backend operations
#[derive(Error, Debug)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: u16, message: String },

    /// Credentials rejected by the identity provider
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// No session is held locally
    #[error("No signed in user")]
    NotSignedIn,

    /// The held session token has expired
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// The object or record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend's access policy refused the operation
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any remote call
    #[error("{0}")]
    Validation(String),
}

impl BackendError {
    /// Check if error indicates the session is missing or rejected
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            BackendError::Authentication { .. }
                | BackendError::NotSignedIn
                | BackendError::SessionExpired
        )
    }

    /// Create an error from a non-success status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::UNAUTHORIZED => BackendError::Authentication { message },
            StatusCode::FORBIDDEN => BackendError::AccessDenied(message),
            StatusCode::NOT_FOUND => BackendError::NotFound(message),
            _ => BackendError::Api {
                code: status.as_u16(),
                message,
            },
        }
    }
}

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_auth_error() {
        assert!(BackendError::NotSignedIn.is_auth_error());
        assert!(BackendError::SessionExpired.is_auth_error());
        assert!(!BackendError::NotFound("x".to_string()).is_auth_error());
    }

    #[test]
    fn test_api_error_creation() {
        let err = BackendError::api_error(StatusCode::BAD_REQUEST, "Invalid code");
        match err {
            BackendError::Api { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "Invalid code");
            }
            _ => panic!("Expected Api error variant"),
        }
    }

    #[test]
    fn test_api_error_maps_policy_statuses() {
        assert!(matches!(
            BackendError::api_error(StatusCode::UNAUTHORIZED, "bad token"),
            BackendError::Authentication { .. }
        ));
        assert!(matches!(
            BackendError::api_error(StatusCode::FORBIDDEN, "not yours"),
            BackendError::AccessDenied(_)
        ));
        assert!(matches!(
            BackendError::api_error(StatusCode::NOT_FOUND, "gone"),
            BackendError::NotFound(_)
        ));
    }

    #[test]
    fn test_validation_error_displays_bare_message() {
        let err = BackendError::Validation("Title is required".to_string());
        assert_eq!(err.to_string(), "Title is required");
    }
}
