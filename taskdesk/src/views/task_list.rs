//! Task list view and the task actions behind it.

use std::fmt::Write as _;

use tracing::warn;

use super::ActionError;
use crate::api::{ApiClient, NEWEST_FIRST};
use crate::models::{RecordId, Task, TaskDraft, TaskFilter};

const FETCH_FAILED: &str = "Error fetching tasks";
const SAVE_FAILED: &str = "Error saving task";
const DELETE_FAILED: &str = "Error deleting task";
const UPDATE_FAILED: &str = "Error updating task";
const TITLE_REQUIRED: &str = "Task title is required";

/// All tasks, newest first.
pub async fn fetch_tasks(api: &ApiClient) -> Result<Vec<Task>, ActionError> {
    api.list_tasks(NEWEST_FIRST).await.map_err(|e| {
        warn!(error = %e, "Error fetching tasks");
        ActionError::from(FETCH_FAILED)
    })
}

/// Create a task, or update `editing` when set. A blank title is refused
/// before anything is sent.
pub async fn save_task(
    api: &ApiClient,
    editing: Option<&RecordId>,
    draft: &TaskDraft,
) -> Result<(), ActionError> {
    if draft.title.trim().is_empty() {
        return Err(TITLE_REQUIRED.into());
    }

    let result = match editing {
        Some(id) => api.update_task(id, draft).await,
        None => api.create_task(draft).await,
    };
    result.map_err(|e| {
        warn!(error = %e, "Error saving task");
        ActionError::from(SAVE_FAILED)
    })
}

pub async fn delete_task(api: &ApiClient, id: &RecordId) -> Result<(), ActionError> {
    api.delete_task(id).await.map_err(|e| {
        warn!(error = %e, %id, "Error deleting task");
        ActionError::from(DELETE_FAILED)
    })
}

/// Flip a task between pending and completed.
pub async fn toggle_task(api: &ApiClient, id: &RecordId) -> Result<(), ActionError> {
    api.toggle_task(id).await.map_err(|e| {
        warn!(error = %e, %id, "Error updating task");
        ActionError::from(UPDATE_FAILED)
    })
}

/// One task as a short block of lines.
pub fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut out = format!("[{mark}] {}  ({})\n", task.title, task.id);

    if let Some(description) = task.description() {
        let _ = writeln!(out, "    {description}");
    }

    let mut meta = vec![task.priority.to_string()];
    if let Some(created) = task.created_at {
        meta.push(format!("Created: {}", created.format("%Y-%m-%d")));
    }
    if let Some(due) = task.due_date {
        meta.push(format!("Due: {}", due.format("%Y-%m-%d")));
    }
    let _ = writeln!(out, "    {}", meta.join("  "));
    out
}

/// The filtered list, or the filter's empty-state message.
pub fn render_task_list(tasks: &[Task], filter: TaskFilter) -> String {
    let visible = filter.apply(tasks);
    if visible.is_empty() {
        return format!("{}\n", filter.empty_message());
    }
    visible.into_iter().map(format_task).collect()
}
