/*
[INPUT]:  Data API implementation, task inputs and patches
[OUTPUT]: Canonical tasks
[POS]:    Task layer - task service used by the view containers
[UPDATE]: When task operations or their error policy change
*/

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::http::Result;

use super::DataApi;
use super::schema::{NewTask, Task, TaskPatch, TodoWrite};

/// Pass-through task service. No caching: callers reload after a mutation.
#[derive(Clone)]
pub struct TaskService {
    api: Arc<dyn DataApi>,
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskService").finish_non_exhaustive()
    }
}

impl TaskService {
    pub fn new(api: Arc<dyn DataApi>) -> Self {
        Self { api }
    }

    pub async fn create_todo(&self, task: &NewTask) -> Result<Task> {
        let body = TodoWrite::from(task);
        self.api
            .create_todo(&body)
            .await
            .map(Task::from)
            .inspect(|task| info!(id = %task.id, "todo created"))
            .inspect_err(|err| error!(error = %err, "create todo failed"))
    }

    /// Every task, following page tokens until the listing is exhausted.
    pub async fn list_todos(&self) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let page = self
                .api
                .list_todos_page(next_token.as_deref())
                .await
                .inspect_err(|err| error!(error = %err, "list todos failed"))?;
            tasks.extend(page.items.into_iter().map(Task::from));
            match page.next_token {
                Some(token) if next_token.as_deref() == Some(token.as_str()) => {
                    warn!(token = %token, "listing repeated its page token; stopping");
                    break;
                }
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }
        debug!(count = tasks.len(), "todos listed");
        Ok(tasks)
    }

    pub async fn update_todo(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        let body = TodoWrite::from(patch);
        self.api
            .update_todo(id, &body)
            .await
            .map(Task::from)
            .inspect(|_| info!(id, "todo updated"))
            .inspect_err(|err| error!(id, error = %err, "update todo failed"))
    }

    pub async fn delete_todo(&self, id: &str) -> Result<()> {
        self.api
            .delete_todo(id)
            .await
            .inspect(|_| info!(id, "todo deleted"))
            .inspect_err(|err| error!(id, error = %err, "delete todo failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::BackendError;
    use crate::memory::InMemoryBackend;
    use crate::types::TaskStatus;

    async fn service() -> (InMemoryBackend, TaskService) {
        let backend = InMemoryBackend::new().with_page_size(2);
        backend.register_confirmed("ada@example.com", "pw", "Ada").await;
        backend.sign_in_as("ada@example.com").await.unwrap();
        let service = TaskService::new(Arc::new(backend.clone()));
        (backend, service)
    }

    #[tokio::test]
    async fn test_list_follows_pages() {
        let (_backend, tasks) = service().await;
        for title in ["one", "two", "three", "four", "five"] {
            tasks.create_todo(&NewTask::new(title)).await.unwrap();
        }

        let listed = tasks.list_todos().await.unwrap();
        let titles: Vec<_> = listed.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["one", "two", "three", "four", "five"]);
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let (_backend, tasks) = service().await;
        let created = tasks
            .create_todo(&NewTask::new("Plan").with_content("sprint"))
            .await
            .unwrap();

        let updated = tasks
            .update_todo(&created.id, &TaskPatch::status(TaskStatus::Done))
            .await
            .unwrap();

        assert!(updated.is_done());
        assert_eq!(updated.title, "Plan");
        assert_eq!(updated.content.as_deref(), Some("sprint"));
    }

    #[tokio::test]
    async fn test_delete_then_list() {
        let (_backend, tasks) = service().await;
        let created = tasks.create_todo(&NewTask::new("Temp")).await.unwrap();
        tasks.delete_todo(&created.id).await.unwrap();

        assert!(tasks.list_todos().await.unwrap().is_empty());
        let err = tasks.delete_todo(&created.id).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_requires_session() {
        let backend = InMemoryBackend::new();
        let tasks = TaskService::new(Arc::new(backend));
        let err = tasks.list_todos().await.unwrap_err();
        assert!(matches!(err, BackendError::NotSignedIn));
    }
}
