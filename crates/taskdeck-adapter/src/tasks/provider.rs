/*
[INPUT]:  `Todo` write payloads, ids and page tokens
[OUTPUT]: Stored `Todo` records
[POS]:    Task layer - structured-data API abstraction
[UPDATE]: When the data API gains operations
*/

use async_trait::async_trait;

use crate::http::Result;
use crate::types::Page;

use super::schema::{TodoRecord, TodoWrite};

/// Remote structured-data API exposing the `Todo` model
#[async_trait]
pub trait DataApi: Send + Sync {
    async fn create_todo(&self, body: &TodoWrite) -> Result<TodoRecord>;

    /// One page of records; pass the previous page's `next_token` to continue.
    async fn list_todos_page(&self, next_token: Option<&str>) -> Result<Page<TodoRecord>>;

    async fn update_todo(&self, id: &str, body: &TodoWrite) -> Result<TodoRecord>;

    async fn delete_todo(&self, id: &str) -> Result<()>;
}
