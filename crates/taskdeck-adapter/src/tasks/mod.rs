/*
[INPUT]:  Structured-data API seam
[OUTPUT]: Canonical tasks and their CRUD operations
[POS]:    Task layer - wraps the hosted `Todo` model
[UPDATE]: When the task schema or task operations change
*/

pub mod provider;
pub mod schema;
pub mod service;

pub use provider::DataApi;
pub use schema::{NewTask, Task, TaskPatch, TodoRecord, TodoWrite};
pub use service::TaskService;
