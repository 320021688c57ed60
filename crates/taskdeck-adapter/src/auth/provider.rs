/*
[INPUT]:  Sign-up, confirmation and sign-in parameters
[OUTPUT]: Identity provider outcomes
[POS]:    Auth layer - identity provider abstraction
[UPDATE]: When adding new identity operations
*/

use async_trait::async_trait;

use crate::http::Result;
use crate::types::{
    ConfirmSignUpParams, CurrentUser, SignInOutcome, SignInParams, SignUpOutcome, SignUpParams,
};

/// Remote identity provider
///
/// The username is always the email address. Implemented over HTTP by
/// [`crate::BackendClient`] and in memory by [`crate::InMemoryBackend`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, params: &SignUpParams) -> Result<SignUpOutcome>;

    async fn confirm_sign_up(&self, params: &ConfirmSignUpParams) -> Result<SignUpOutcome>;

    async fn sign_in(&self, params: &SignInParams) -> Result<SignInOutcome>;

    async fn sign_out(&self) -> Result<()>;

    /// The signed-in user; fails with `NotSignedIn` for an anonymous caller.
    async fn current_user(&self) -> Result<CurrentUser>;
}
