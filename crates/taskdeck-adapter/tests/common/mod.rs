/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for taskdeck-adapter tests

use std::sync::Arc;

use taskdeck_adapter::{
    AuthService, BackendClient, ClientConfig, CurrentUser, InMemoryBackend, StorageService,
    TaskService,
};
use wiremock::MockServer;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct-horse";
pub const NAME: &str = "Ada";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client with all three services pointed at `server`
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::with_config_and_base_urls(
        ClientConfig::default(),
        &server.uri(),
        &server.uri(),
        &server.uri(),
    )
    .expect("client init")
}

/// Mock access token for testing
#[allow(dead_code)]
pub fn mock_access_token() -> String {
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.signature".to_string()
}

/// Current user body as served by the identity endpoint
#[allow(dead_code)]
pub fn current_user_json(identity_id: &str) -> serde_json::Value {
    serde_json::json!({
        "userId": "user-1",
        "username": EMAIL,
        "identityId": identity_id,
        "signInDetails": {"loginId": EMAIL},
        "name": NAME,
    })
}

/// Services wired to one in-memory backend
#[allow(dead_code)]
pub struct Harness {
    pub backend: InMemoryBackend,
    pub auth: AuthService,
    pub storage: StorageService,
    pub tasks: TaskService,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        let backend = InMemoryBackend::new();
        Self {
            auth: AuthService::new(Arc::new(backend.clone())),
            storage: StorageService::new(Arc::new(backend.clone())),
            tasks: TaskService::new(Arc::new(backend.clone())),
            backend,
        }
    }

    /// Register a confirmed account and sign in as it.
    pub async fn signed_in(&self, email: &str) -> CurrentUser {
        self.backend.register_confirmed(email, PASSWORD, NAME).await;
        self.auth
            .sign_in(email, PASSWORD)
            .await
            .expect("sign in");
        self.auth.get_current_user().await.expect("current user")
    }
}
