/*
[INPUT]:  Registration fields, confirmation code and submit intents
[OUTPUT]: Sign-up stage, transient errors, notices and navigation
[POS]:    Container layer - two-stage registration form
[UPDATE]: When the registration or confirmation flow changes
*/

use taskdeck_adapter::{AuthService, SignInStep, SignUpStep};
use tracing::{info, warn};

use super::{Notice, Route, ViewCell, failure_message};

pub const OTP_LENGTH: usize = 6;

/// Registration stage
///
/// Transitions:
/// - Details -> Confirm (provider asks for a code)
/// - Details -> Complete (no confirmation needed)
/// - Confirm -> Complete (code accepted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignUpStage {
    #[default]
    Details,
    Confirm,
    Complete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpState {
    pub stage: SignUpStage,
    pub name: String,
    pub email: String,
    pub password: String,
    pub otp: String,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct SignUpForm {
    auth: AuthService,
    cell: ViewCell<SignUpState>,
}

impl SignUpForm {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            cell: ViewCell::default(),
        }
    }

    pub fn cell(&self) -> &ViewCell<SignUpState> {
        &self.cell
    }

    pub async fn state(&self) -> SignUpState {
        self.cell.snapshot().await
    }

    pub async fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.cell.update(|state| state.name = name).await;
    }

    pub async fn set_email(&self, email: impl Into<String>) {
        let email = email.into();
        self.cell.update(|state| state.email = email).await;
    }

    pub async fn set_password(&self, password: impl Into<String>) {
        let password = password.into();
        self.cell.update(|state| state.password = password).await;
    }

    /// Keep the digits of `otp`, at most six.
    pub async fn set_otp(&self, otp: &str) {
        let digits: String = otp
            .chars()
            .filter(char::is_ascii_digit)
            .take(OTP_LENGTH)
            .collect();
        self.cell.update(|state| state.otp = digits).await;
    }

    pub async fn submit(&self) {
        let fields = self
            .cell
            .update(|state| {
                let name = state.name.trim().to_string();
                let email = state.email.trim().to_string();
                if name.is_empty() || email.is_empty() || state.password.is_empty() {
                    state.error = Some("Name, email and password are required".to_string());
                    return None;
                }
                state.submitting = true;
                state.error = None;
                Some((name, email, state.password.clone()))
            })
            .await;
        let Some((name, email, password)) = fields else {
            return;
        };

        match self.auth.sign_up(&email, &password, &name).await {
            Ok(outcome) => match outcome.next_step {
                SignUpStep::ConfirmSignUp => {
                    self.cell
                        .update(|state| {
                            state.submitting = false;
                            state.stage = SignUpStage::Confirm;
                        })
                        .await;
                    self.cell
                        .notify(Notice::success("Check your email for the confirmation code"))
                        .await;
                }
                SignUpStep::Done => {
                    self.cell
                        .update(|state| {
                            state.submitting = false;
                            state.stage = SignUpStage::Complete;
                            state.password.clear();
                        })
                        .await;
                    self.cell.notify(Notice::success("Account created")).await;
                    self.cell.navigate(Route::Login).await;
                }
            },
            Err(err) => {
                let message = failure_message(&err, "Sign up failed");
                self.cell
                    .update(|state| {
                        state.submitting = false;
                        state.error = Some(message);
                    })
                    .await;
            }
        }
    }

    /// Confirm the code, then sign in with the registered credentials.
    pub async fn confirm(&self) {
        let fields = self
            .cell
            .update(|state| {
                if state.otp.len() != OTP_LENGTH {
                    state.error = Some(format!("Enter the {OTP_LENGTH}-digit code"));
                    return None;
                }
                state.submitting = true;
                state.error = None;
                Some((state.email.trim().to_string(), state.password.clone(), state.otp.clone()))
            })
            .await;
        let Some((email, password, otp)) = fields else {
            return;
        };

        if let Err(err) = self.auth.confirm_sign_up(&email, &otp).await {
            let message = failure_message(&err, "Confirm sign up failed");
            self.cell
                .update(|state| {
                    state.submitting = false;
                    state.error = Some(message);
                })
                .await;
            return;
        }

        self.cell
            .update(|state| {
                state.submitting = false;
                state.stage = SignUpStage::Complete;
                state.password.clear();
                state.otp.clear();
            })
            .await;
        self.cell.notify(Notice::success("Account confirmed")).await;

        let route = match self.auth.sign_in(&email, &password).await {
            Ok(outcome) if outcome.is_signed_in => Route::Dashboard,
            Ok(outcome) => {
                info!(next_step = ?outcome.next_step, "confirmed but not signed in");
                if outcome.next_step == SignInStep::ResetPassword {
                    self.cell.notify(Notice::warning("Password reset required")).await;
                }
                Route::Login
            }
            Err(err) => {
                warn!(error = %err, "sign in after confirmation failed");
                Route::Login
            }
        };
        self.cell.navigate(route).await;
    }
}
