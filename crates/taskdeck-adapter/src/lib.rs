/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public taskdeck backend adapter surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod memory;
pub mod storage;
pub mod tasks;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{AuthService, IdentityProvider, SessionData, SessionManager};

// Re-export commonly used types from http
pub use http::{BackendClient, BackendError, ClientConfig, Endpoints, Result};

pub use memory::InMemoryBackend;

pub use storage::{ObjectStore, StorageService};

pub use tasks::{DataApi, NewTask, Task, TaskPatch, TaskService, TodoRecord, TodoWrite};

// Re-export all types
pub use types::*;
