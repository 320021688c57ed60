/*
[INPUT]:  Email/password fields and submit intent
[OUTPUT]: Sign-in outcome as error string or navigation
[POS]:    Container layer - sign-in form
[UPDATE]: When the sign-in flow changes
*/

use taskdeck_adapter::{AuthService, SignInStep};
use tracing::info;

use super::{Notice, Route, ViewCell, failure_message};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInState {
    pub email: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct SignInForm {
    auth: AuthService,
    cell: ViewCell<SignInState>,
}

impl SignInForm {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            cell: ViewCell::default(),
        }
    }

    pub fn cell(&self) -> &ViewCell<SignInState> {
        &self.cell
    }

    pub async fn state(&self) -> SignInState {
        self.cell.snapshot().await
    }

    pub async fn set_email(&self, email: impl Into<String>) {
        let email = email.into();
        self.cell.update(|state| state.email = email).await;
    }

    pub async fn set_password(&self, password: impl Into<String>) {
        let password = password.into();
        self.cell.update(|state| state.password = password).await;
    }

    /// Returns whether the user ended up signed in.
    pub async fn submit(&self) -> bool {
        let fields = self
            .cell
            .update(|state| {
                let email = state.email.trim().to_string();
                if email.is_empty() || state.password.is_empty() {
                    state.error = Some("Email and password are required".to_string());
                    return None;
                }
                state.submitting = true;
                state.error = None;
                Some((email, state.password.clone()))
            })
            .await;
        let Some((email, password)) = fields else {
            return false;
        };

        let result = self.auth.sign_in(&email, &password).await;
        let error = match &result {
            Ok(outcome) if outcome.is_signed_in => None,
            Ok(outcome) if outcome.next_step == SignInStep::ConfirmSignUp => {
                Some("Account is not confirmed yet".to_string())
            }
            Ok(outcome) => {
                info!(next_step = ?outcome.next_step, "sign in needs another step");
                Some("Sign in needs another step".to_string())
            }
            Err(err) => Some(failure_message(err, "Sign in failed")),
        };

        let signed_in = error.is_none();
        self.cell
            .update(|state| {
                state.submitting = false;
                state.password.clear();
                state.error = error;
            })
            .await;
        if signed_in {
            self.cell.notify(Notice::success("Signed in")).await;
            self.cell.navigate(Route::Dashboard).await;
        } else if matches!(&result, Ok(o) if o.next_step == SignInStep::ConfirmSignUp) {
            self.cell.navigate(Route::SignUp).await;
        }
        signed_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use taskdeck_adapter::InMemoryBackend;

    #[tokio::test]
    async fn test_success_navigates_to_dashboard() {
        let backend = InMemoryBackend::new();
        backend.register_confirmed("ada@example.com", "pw", "Ada").await;
        let form = SignInForm::new(AuthService::new(Arc::new(backend)));
        form.set_email("ada@example.com").await;
        form.set_password("pw").await;

        assert!(form.submit().await);
        assert_eq!(form.cell().take_navigation().await, Some(Route::Dashboard));
        assert!(form.state().await.password.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_password_sets_error() {
        let backend = InMemoryBackend::new();
        backend.register_confirmed("ada@example.com", "pw", "Ada").await;
        let form = SignInForm::new(AuthService::new(Arc::new(backend)));
        form.set_email("ada@example.com").await;
        form.set_password("nope").await;

        assert!(!form.submit().await);
        assert_eq!(
            form.state().await.error.as_deref(),
            Some("Authentication failed: Incorrect username or password.")
        );
        assert_eq!(form.cell().take_navigation().await, None);
    }
}
