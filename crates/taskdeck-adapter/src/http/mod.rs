/*
[INPUT]:  HTTP client configuration and backend endpoints
[OUTPUT]: HTTP responses and typed backend results
[POS]:    HTTP layer - REST communication with the hosted services
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod data;
pub mod error;
pub mod identity;
pub mod objects;

pub use error::{BackendError, Result};

pub use client::{BackendClient, ClientConfig, Endpoints};
