/*
[INPUT]:  Identity provider implementation
[OUTPUT]: Session operations with logging and error pass-through
[POS]:    Auth layer - session service used by the view containers
[UPDATE]: When session operations or their error policy change
*/

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::http::Result;
use crate::types::{
    ConfirmSignUpParams, CurrentUser, SignInOutcome, SignInParams, SignUpOutcome, SignUpParams,
};

use super::IdentityProvider;

/// Session service: one remote call per operation, errors logged and returned unchanged.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<SignUpOutcome> {
        let params = SignUpParams {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        match self.provider.sign_up(&params).await {
            Ok(outcome) => {
                info!(email, next_step = ?outcome.next_step, "sign up accepted");
                Ok(outcome)
            }
            Err(err) => {
                error!(email, error = %err, "sign up failed");
                Err(err)
            }
        }
    }

    pub async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<SignUpOutcome> {
        let params = ConfirmSignUpParams {
            email: email.to_string(),
            code: code.to_string(),
        };
        self.provider
            .confirm_sign_up(&params)
            .await
            .inspect(|_| info!(email, "sign up confirmed"))
            .inspect_err(|err| error!(email, error = %err, "confirm sign up failed"))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome> {
        let params = SignInParams {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.provider
            .sign_in(&params)
            .await
            .inspect(|outcome| {
                info!(email, signed_in = outcome.is_signed_in, next_step = ?outcome.next_step, "sign in")
            })
            .inspect_err(|err| error!(email, error = %err, "sign in failed"))
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.provider
            .sign_out()
            .await
            .inspect(|_| info!("signed out"))
            .inspect_err(|err| error!(error = %err, "sign out failed"))
    }

    /// Current user, or `None` for an anonymous visitor. Never fails.
    pub async fn get_current_user(&self) -> Option<CurrentUser> {
        match self.provider.current_user().await {
            Ok(user) => Some(user),
            Err(err) => {
                debug!(error = %err, "no current user");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;
    use crate::types::{SignInStep, SignUpStep};

    fn service(backend: &InMemoryBackend) -> AuthService {
        AuthService::new(Arc::new(backend.clone()))
    }

    #[tokio::test]
    async fn test_get_current_user_without_session_is_none() {
        let backend = InMemoryBackend::new();
        assert!(service(&backend).get_current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_sign_up_confirm_sign_in() {
        let backend = InMemoryBackend::new();
        let auth = service(&backend);

        let outcome = auth.sign_up("ada@example.com", "hunter22", "Ada").await.unwrap();
        assert!(!outcome.is_sign_up_complete);
        assert_eq!(outcome.next_step, SignUpStep::ConfirmSignUp);

        let code = backend.confirmation_code("ada@example.com").await.unwrap();
        let confirmed = auth.confirm_sign_up("ada@example.com", &code).await.unwrap();
        assert!(confirmed.is_sign_up_complete);

        let signed_in = auth.sign_in("ada@example.com", "hunter22").await.unwrap();
        assert!(signed_in.is_signed_in);
        assert_eq!(signed_in.next_step, SignInStep::Done);

        let user = auth.get_current_user().await.unwrap();
        assert_eq!(user.login_id(), "ada@example.com");
        assert_eq!(user.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let backend = InMemoryBackend::new();
        let auth = service(&backend);
        auth.sign_up("ada@example.com", "hunter22", "Ada").await.unwrap();

        let err = auth.sign_up("ada@example.com", "other", "Ada").await.unwrap_err();
        assert_eq!(err.to_string(), "API error (code 400): User already exists");
    }
}
