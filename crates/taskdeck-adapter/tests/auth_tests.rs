/*
[INPUT]:  In-memory backend and mock identity responses
[OUTPUT]: Test results for sign-up, confirmation and sign-in flows
[POS]:    Integration tests - authentication
[UPDATE]: When auth endpoints or flow changes
*/

mod common;

use std::sync::Arc;

use common::{EMAIL, Harness, NAME, PASSWORD, client_for, current_user_json, mock_access_token, setup_mock_server};
use taskdeck_adapter::{AuthService, BackendError, SignInStep, SignUpStep};
use tokio_test::assert_ok;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_full_sign_up_flow() {
    let harness = Harness::new();

    let outcome = assert_ok!(harness.auth.sign_up(EMAIL, PASSWORD, NAME).await);
    assert!(!outcome.is_sign_up_complete);
    assert_eq!(outcome.next_step, SignUpStep::ConfirmSignUp);

    let code = harness.backend.confirmation_code(EMAIL).await.unwrap();
    let confirmed = assert_ok!(harness.auth.confirm_sign_up(EMAIL, &code).await);
    assert!(confirmed.is_sign_up_complete);
    assert_eq!(confirmed.next_step, SignUpStep::Done);

    let signed_in = assert_ok!(harness.auth.sign_in(EMAIL, PASSWORD).await);
    assert!(signed_in.is_signed_in);

    let user = harness.auth.get_current_user().await.unwrap();
    assert_eq!(user.login_id(), EMAIL);
    assert_eq!(user.name.as_deref(), Some(NAME));
}

#[tokio::test]
async fn test_only_the_issued_code_confirms() {
    let harness = Harness::new();
    assert_ok!(harness.auth.sign_up(EMAIL, PASSWORD, NAME).await);
    let code = harness.backend.confirmation_code(EMAIL).await.unwrap();

    for attempt in ["", "000000x", "12345", "abcdef"] {
        if attempt == code {
            continue;
        }
        let err = harness.auth.confirm_sign_up(EMAIL, attempt).await.unwrap_err();
        assert!(matches!(err, BackendError::Api { code: 400, .. }));
        assert!(!harness.backend.is_confirmed(EMAIL).await);
    }

    assert_ok!(harness.auth.confirm_sign_up(EMAIL, &code).await);
    assert!(harness.backend.is_confirmed(EMAIL).await);
}

#[tokio::test]
async fn test_unconfirmed_account_cannot_sign_in() {
    let harness = Harness::new();
    assert_ok!(harness.auth.sign_up(EMAIL, PASSWORD, NAME).await);

    let outcome = assert_ok!(harness.auth.sign_in(EMAIL, PASSWORD).await);
    assert!(!outcome.is_signed_in);
    assert_eq!(outcome.next_step, SignInStep::ConfirmSignUp);
    assert!(harness.auth.get_current_user().await.is_none());
}

#[tokio::test]
async fn test_wrong_password_is_authentication_error() {
    let harness = Harness::new();
    harness.backend.register_confirmed(EMAIL, PASSWORD, NAME).await;

    let err = harness.auth.sign_in(EMAIL, "nope").await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(err.to_string(), "Authentication failed: Incorrect username or password.");
}

#[tokio::test]
async fn test_sign_out_drops_current_user() {
    let harness = Harness::new();
    harness.signed_in(EMAIL).await;

    assert_ok!(harness.auth.sign_out().await);
    assert!(harness.auth.get_current_user().await.is_none());
}

#[tokio::test]
async fn test_http_sign_in_then_current_user() {
    let server = setup_mock_server().await;
    let token = mock_access_token();

    Mock::given(method("POST"))
        .and(path("/v1/auth/sign-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "isSignedIn": true,
            "nextStep": {"signInStep": "DONE"},
            "tokens": {"accessToken": token, "expiresIn": 3600},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/current-user"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_user_json("us-east-1:abc")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let auth = AuthService::new(Arc::new(client.clone()));

    let outcome = assert_ok!(auth.sign_in(EMAIL, PASSWORD).await);
    assert!(outcome.is_signed_in);
    assert!(client.session().is_signed_in());

    let user = auth.get_current_user().await.unwrap();
    assert_eq!(user.identity_id.as_str(), "us-east-1:abc");
}

#[tokio::test]
async fn test_http_current_user_failure_is_none() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/auth/current-user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Access Token has expired",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.session().set_token(mock_access_token(), 3600);
    let auth = AuthService::new(Arc::new(client));

    assert!(auth.get_current_user().await.is_none());
}
