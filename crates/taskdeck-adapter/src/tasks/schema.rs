/*
[INPUT]:  `Todo` records in either wire shape
[OUTPUT]: Canonical `Task` values and write payloads
[POS]:    Task layer - single task schema plus the wire adapter
[UPDATE]: When the `Todo` model gains or renames fields
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TaskStatus;

/// Canonical task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}

/// `Todo` record as stored by the backend.
///
/// Two shapes are in circulation: `content` + `isDone`, and
/// `description` + `status`. Both deserialize here; an explicit `status`
/// wins over `isDone` when both are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TodoRecord> for Task {
    fn from(record: TodoRecord) -> Self {
        let status = record
            .status
            .or(record.is_done.map(TaskStatus::from_done_flag))
            .unwrap_or_default();
        Self {
            id: record.id,
            title: record.title.unwrap_or_default(),
            content: record.content.or(record.description),
            status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Write payload for create and partial update.
///
/// `isDone` always mirrors `status` so readers of either shape agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoWrite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
}

impl TodoWrite {
    /// Apply this write to a stored record.
    pub fn apply_to(&self, record: &mut TodoRecord) {
        if let Some(title) = &self.title {
            record.title = Some(title.clone());
        }
        if let Some(content) = &self.content {
            record.content = Some(content.clone());
            record.description = None;
        }
        if let Some(status) = self.status {
            record.status = Some(status);
        }
        if let Some(done) = self.is_done {
            record.is_done = Some(done);
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub content: Option<String>,
    pub status: TaskStatus,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

impl From<&NewTask> for TodoWrite {
    fn from(task: &NewTask) -> Self {
        Self {
            title: Some(task.title.clone()),
            content: task.content.clone(),
            status: Some(task.status),
            is_done: Some(task.status.is_done()),
        }
    }
}

/// Partial update; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.status.is_none()
    }
}

impl From<&TaskPatch> for TodoWrite {
    fn from(patch: &TaskPatch) -> Self {
        Self {
            title: patch.title.clone(),
            content: patch.content.clone(),
            status: patch.status,
            is_done: patch.status.map(TaskStatus::is_done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: serde_json::Value) -> TodoRecord {
        serde_json::from_value(value).expect("record")
    }

    #[test]
    fn test_both_wire_shapes_map_to_same_task() {
        let legacy = record(serde_json::json!({
            "id": "t-1",
            "title": "Write report",
            "content": "quarterly",
            "isDone": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z",
        }));
        let current = record(serde_json::json!({
            "id": "t-1",
            "title": "Write report",
            "description": "quarterly",
            "status": "DONE",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z",
        }));

        let a = Task::from(legacy);
        let b = Task::from(current);
        assert_eq!(a, b);
        assert!(a.is_done());
        assert_eq!(a.content.as_deref(), Some("quarterly"));
    }

    #[test]
    fn test_status_wins_over_done_flag() {
        let task = Task::from(record(serde_json::json!({
            "id": "t-2",
            "title": "Review",
            "isDone": false,
            "status": "IN_PROGRESS",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        })));
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_null_fields_default() {
        let task = Task::from(record(serde_json::json!({
            "id": "t-3",
            "title": null,
            "content": null,
            "isDone": null,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        })));
        assert_eq!(task.title, "");
        assert!(task.content.is_none());
        assert_eq!(task.status, TaskStatus::Open);
    }

    #[test]
    fn test_patch_write_only_sends_set_fields() {
        let write = TodoWrite::from(&TaskPatch::status(TaskStatus::Done));
        assert_eq!(
            serde_json::to_value(&write).unwrap(),
            serde_json::json!({"status": "DONE", "isDone": true})
        );
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn test_new_task_write_mirrors_done_flag() {
        let write = TodoWrite::from(&NewTask::new("Plan").with_content("sprint"));
        assert_eq!(
            serde_json::to_value(&write).unwrap(),
            serde_json::json!({"title": "Plan", "content": "sprint", "status": "OPEN", "isDone": false})
        );
    }
}
