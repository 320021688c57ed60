/*
[INPUT]:  Backend implementation (HTTP client or in-memory)
[OUTPUT]: The three service wrappers sharing that backend
[POS]:    Wiring layer - handed to every container
[UPDATE]: When a service is added or its construction changes
*/

use std::sync::Arc;
use std::time::Duration;

use taskdeck_adapter::{AuthService, BackendClient, InMemoryBackend, StorageService, TaskService};

#[derive(Debug, Clone)]
pub struct Services {
    pub auth: AuthService,
    pub storage: StorageService,
    pub tasks: TaskService,
}

impl Services {
    pub fn from_client(client: BackendClient, url_expires_in: Duration) -> Self {
        Self {
            auth: AuthService::new(Arc::new(client.clone())),
            storage: StorageService::new(Arc::new(client.clone()))
                .with_url_expires_in(url_expires_in),
            tasks: TaskService::new(Arc::new(client)),
        }
    }

    pub fn in_memory(backend: &InMemoryBackend) -> Self {
        Self {
            auth: AuthService::new(Arc::new(backend.clone())),
            storage: StorageService::new(Arc::new(backend.clone())),
            tasks: TaskService::new(Arc::new(backend.clone())),
        }
    }
}
