/*
[INPUT]:  In-memory backend and preference stores
[OUTPUT]: Shared fixtures for container tests
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

use std::sync::Arc;

use taskdeck_adapter::{CurrentUser, InMemoryBackend};
use taskdeck_app::{MemoryPreferences, PreferenceStore, Services};

#[allow(dead_code)]
pub const EMAIL: &str = "ada@example.com";
#[allow(dead_code)]
pub const PASSWORD: &str = "correct-horse";

#[allow(dead_code)]
pub struct Fixture {
    pub backend: InMemoryBackend,
    pub services: Services,
    pub prefs: Arc<dyn PreferenceStore>,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        Self::with_backend(InMemoryBackend::new())
    }

    pub fn with_backend(backend: InMemoryBackend) -> Self {
        Self {
            services: Services::in_memory(&backend),
            prefs: Arc::new(MemoryPreferences::new()),
            backend,
        }
    }

    pub async fn sign_in(&self, email: &str) -> CurrentUser {
        self.backend.register_confirmed(email, PASSWORD, "Ada").await;
        self.backend.sign_in_as(email).await.expect("sign in")
    }
}
