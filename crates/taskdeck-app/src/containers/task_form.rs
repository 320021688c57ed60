/*
[INPUT]:  Task field edits and submit/cancel intents
[OUTPUT]: Validated task creation, acknowledged by the server
[POS]:    Container layer - create-task form
[UPDATE]: When task fields or validation rules change
*/

use taskdeck_adapter::{NewTask, Task, TaskService, TaskStatus};
use tracing::{error, info};

use super::{Notice, ViewCell, failure_message};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFormState {
    pub title: String,
    pub content: String,
    pub status: TaskStatus,
    pub submitting: bool,
    pub error: Option<String>,
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The server stored the task
    Submitted(Task),
    /// Rejected locally, nothing sent
    Invalid(String),
    Failed(String),
}

#[derive(Debug)]
pub struct TaskForm {
    tasks: TaskService,
    cell: ViewCell<TaskFormState>,
}

impl TaskForm {
    pub fn new(tasks: TaskService) -> Self {
        Self {
            tasks,
            cell: ViewCell::default(),
        }
    }

    pub fn cell(&self) -> &ViewCell<TaskFormState> {
        &self.cell
    }

    pub async fn state(&self) -> TaskFormState {
        self.cell.snapshot().await
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.cell.update(|state| state.title = title).await;
    }

    pub async fn set_content(&self, content: impl Into<String>) {
        let content = content.into();
        self.cell.update(|state| state.content = content).await;
    }

    pub async fn set_status(&self, status: TaskStatus) {
        self.cell.update(|state| state.status = status).await;
    }

    pub async fn submit(&self) -> Submission {
        let draft = self
            .cell
            .update(|state| {
                let title = state.title.trim();
                if title.is_empty() {
                    state.error = Some("Title is required".to_string());
                    return None;
                }
                if state.submitting {
                    return None;
                }
                state.submitting = true;
                state.error = None;
                let mut task = NewTask::new(title).with_status(state.status);
                let content = state.content.trim();
                if !content.is_empty() {
                    task = task.with_content(content);
                }
                Some(task)
            })
            .await;
        let Some(draft) = draft else {
            let reason = self
                .state()
                .await
                .error
                .unwrap_or_else(|| "Already submitting".to_string());
            return Submission::Invalid(reason);
        };

        let result = self.tasks.create_todo(&draft).await;
        match result {
            Ok(task) => {
                info!(id = %task.id, "task created");
                self.cell.update(|state| *state = TaskFormState::default()).await;
                self.cell.notify(Notice::success("Task created")).await;
                Submission::Submitted(task)
            }
            Err(err) => {
                error!(error = %err, "failed to create task");
                let message = failure_message(&err, "Could not create task");
                self.cell
                    .update(|state| {
                        state.submitting = false;
                        state.error = Some(message.clone());
                    })
                    .await;
                Submission::Failed(message)
            }
        }
    }

    /// Discard the draft.
    pub async fn cancel(&self) {
        self.cell.update(|state| *state = TaskFormState::default()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Services;
    use taskdeck_adapter::InMemoryBackend;

    #[tokio::test]
    async fn test_blank_title_is_rejected_without_request() {
        let backend = InMemoryBackend::new();
        let form = TaskForm::new(Services::in_memory(&backend).tasks);
        form.set_title("   ").await;

        let outcome = form.submit().await;
        assert_eq!(outcome, Submission::Invalid("Title is required".to_string()));
    }

    #[tokio::test]
    async fn test_submit_clears_after_ack() {
        let backend = InMemoryBackend::new();
        backend.register_confirmed("ada@example.com", "pw", "Ada").await;
        backend.sign_in_as("ada@example.com").await.unwrap();
        let form = TaskForm::new(Services::in_memory(&backend).tasks);
        form.set_title("Write docs").await;
        form.set_content("  ").await;
        form.set_status(TaskStatus::InProgress).await;

        let Submission::Submitted(task) = form.submit().await else {
            panic!("expected submitted");
        };
        assert_eq!(task.title, "Write docs");
        assert_eq!(task.content, None);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(form.state().await, TaskFormState::default());
    }

    #[tokio::test]
    async fn test_failure_keeps_draft() {
        let backend = InMemoryBackend::new();
        let form = TaskForm::new(Services::in_memory(&backend).tasks);
        form.set_title("Write docs").await;

        assert!(matches!(form.submit().await, Submission::Failed(_)));
        let state = form.state().await;
        assert_eq!(state.title, "Write docs");
        assert!(!state.submitting);
        assert!(state.error.is_some());
    }
}
