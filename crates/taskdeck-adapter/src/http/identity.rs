/*
[INPUT]:  Sign-up/sign-in parameters and the held session token
[OUTPUT]: Identity provider outcomes and the current user
[POS]:    HTTP layer - identity endpoints
[UPDATE]: When identity endpoints or token handling change
*/

use async_trait::async_trait;
use reqwest::Method;

use crate::auth::IdentityProvider;
use crate::http::{BackendClient, BackendError, Result};
use crate::types::{
    ConfirmSignUpParams, ConfirmSignUpRequest, CurrentUser, SignInOutcome, SignInParams,
    SignInRequest, SignInResponse, SignUpOutcome, SignUpParams, SignUpRequest, SignUpResponse,
};

#[async_trait]
impl IdentityProvider for BackendClient {
    /// POST /v1/auth/sign-up
    async fn sign_up(&self, params: &SignUpParams) -> Result<SignUpOutcome> {
        let body = SignUpRequest::from(params);
        let builder = self.auth_request(Method::POST, "/v1/auth/sign-up")?.json(&body);
        let response: SignUpResponse = self.send_json(builder).await?;
        Ok(response.into())
    }

    /// POST /v1/auth/confirm-sign-up
    async fn confirm_sign_up(&self, params: &ConfirmSignUpParams) -> Result<SignUpOutcome> {
        let body = ConfirmSignUpRequest {
            username: params.email.clone(),
            confirmation_code: params.code.clone(),
        };
        let builder = self
            .auth_request(Method::POST, "/v1/auth/confirm-sign-up")?
            .json(&body);
        let response: SignUpResponse = self.send_json(builder).await?;
        Ok(response.into())
    }

    /// POST /v1/auth/sign-in
    ///
    /// On success the token is stored in the session and the user is fetched
    /// and cached alongside it. A failed user fetch leaves the session empty.
    async fn sign_in(&self, params: &SignInParams) -> Result<SignInOutcome> {
        let body = SignInRequest {
            username: params.email.clone(),
            password: params.password.clone(),
        };
        let builder = self.auth_request(Method::POST, "/v1/auth/sign-in")?.json(&body);
        let response: SignInResponse = self.send_json(builder).await?;
        let outcome = SignInOutcome::from(&response);

        if response.is_signed_in {
            let tokens = response.tokens.ok_or_else(|| {
                BackendError::InvalidResponse("signed in without tokens".to_string())
            })?;
            self.session().set_token(tokens.access_token, tokens.expires_in);
            let user = self
                .current_user()
                .await
                .inspect_err(|_| self.session().clear())?;
            self.session().set_user(user);
        }

        Ok(outcome)
    }

    /// POST /v1/auth/sign-out
    ///
    /// The local session is cleared whether or not the remote call succeeds.
    async fn sign_out(&self) -> Result<()> {
        let result = match self.auth_request_with_token(Method::POST, "/v1/auth/sign-out") {
            Ok(builder) => self.send_empty(builder).await,
            Err(BackendError::NotSignedIn) | Err(BackendError::SessionExpired) => Ok(()),
            Err(err) => Err(err),
        };
        self.session().clear();
        result
    }

    /// GET /v1/auth/current-user
    async fn current_user(&self) -> Result<CurrentUser> {
        let builder = self.auth_request_with_token(Method::GET, "/v1/auth/current-user")?;
        self.send_json(builder).await
    }
}
