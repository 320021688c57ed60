/*
[INPUT]:  Task service and per-row user actions
[OUTPUT]: Task rows with their own loading flag
[POS]:    Container layer - task list embedded in the dashboard
[UPDATE]: When row actions or list loading change
*/

use taskdeck_adapter::{Task, TaskPatch, TaskService, TaskStatus};
use tracing::{error, info};

use super::{LoadSlot, Notice, ViewCell, ViewGuard, failure_message};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListState {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct TaskList {
    tasks: TaskService,
    cell: ViewCell<TaskListState>,
    slot: LoadSlot,
}

impl TaskList {
    pub fn new(tasks: TaskService) -> Self {
        Self::with_guard(tasks, ViewGuard::new())
    }

    pub fn with_guard(tasks: TaskService, guard: ViewGuard) -> Self {
        Self {
            tasks,
            cell: ViewCell::with_guard(TaskListState::default(), guard),
            slot: LoadSlot::default(),
        }
    }

    pub fn cell(&self) -> &ViewCell<TaskListState> {
        &self.cell
    }

    pub async fn state(&self) -> TaskListState {
        self.cell.snapshot().await
    }

    pub async fn load(&self) {
        let ticket = self.slot.begin();
        self.cell.update(|state| state.loading = true).await;

        let Some(result) = self.cell.guard().run(self.tasks.list_todos()).await else {
            return;
        };
        self.cell
            .apply(&self.slot, ticket, |state| {
                state.loading = false;
                match result {
                    Ok(tasks) => {
                        state.tasks = tasks;
                        state.error = None;
                    }
                    Err(err) => {
                        error!(error = %err, "failed to load tasks");
                        state.error = Some(failure_message(&err, "Could not load tasks"));
                    }
                }
            })
            .await;
    }

    /// Flip between done and open.
    pub async fn toggle_done(&self, id: &str) -> bool {
        let current = self
            .cell
            .update(|state| state.tasks.iter().find(|t| t.id == id).map(|t| t.status))
            .await;
        let next = match current {
            Some(TaskStatus::Done) => TaskStatus::Open,
            Some(_) => TaskStatus::Done,
            None => return false,
        };
        self.set_status(id, next).await
    }

    /// Returns whether the backend accepted the change.
    pub async fn set_status(&self, id: &str, status: TaskStatus) -> bool {
        let updated = match self.tasks.update_todo(id, &TaskPatch::status(status)).await {
            Ok(_) => {
                info!(id, status = %status, "task status changed");
                true
            }
            Err(err) => {
                error!(id, error = %err, "failed to update task");
                self.cell
                    .notify(Notice::error(failure_message(&err, "Could not update task")))
                    .await;
                false
            }
        };
        self.load().await;
        updated
    }

    /// Returns whether the task was deleted.
    pub async fn delete(&self, id: &str) -> bool {
        let deleted = match self.tasks.delete_todo(id).await {
            Ok(()) => {
                info!(id, "task deleted");
                true
            }
            Err(err) => {
                error!(id, error = %err, "failed to delete task");
                self.cell
                    .notify(Notice::error(failure_message(&err, "Could not delete task")))
                    .await;
                false
            }
        };
        self.load().await;
        deleted
    }
}
