/*
[INPUT]:  Object store seam and identity-scoped paths
[OUTPUT]: Upload, download, delete, list and URL resolution
[POS]:    Storage layer - wraps the hosted per-identity object store
[UPDATE]: When storage operations or path scheme change
*/

pub mod path;
pub mod provider;
pub mod service;

pub use provider::ObjectStore;
pub use service::StorageService;
