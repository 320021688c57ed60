/*
[INPUT]:  Backend schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for backend communication
[UPDATE]: When backend schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::enums::{SignInStep, SignUpStep};
use super::models::{SignInOutcome, SignUpOutcome, StoredFile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpNextStep {
    pub sign_up_step: SignUpStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub is_sign_up_complete: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    pub next_step: SignUpNextStep,
}

impl From<SignUpResponse> for SignUpOutcome {
    fn from(response: SignUpResponse) -> Self {
        Self {
            is_sign_up_complete: response.is_sign_up_complete,
            user_id: response.user_id,
            next_step: response.next_step.sign_up_step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInNextStep {
    pub sign_in_step: SignInStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub is_signed_in: bool,
    pub next_step: SignInNextStep,
    #[serde(default)]
    pub tokens: Option<AuthTokens>,
}

impl From<&SignInResponse> for SignInOutcome {
    fn from(response: &SignInResponse) -> Self {
        Self {
            is_signed_in: response.is_signed_in,
            next_step: response.next_step.sign_in_step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectListResponse {
    pub items: Vec<StoredFile>,
}

/// One page of a model listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "__type", alias = "name")]
    pub code: Option<String>,
}
