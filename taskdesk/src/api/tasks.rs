//! `/tasks` endpoints.

use reqwest::Method;
use serde_json::Value;
use tracing::warn;

use super::{ApiClient, ApiError};
use crate::models::{RecordId, Task, TaskDraft};

/// Newest first, as the list and dashboard views expect.
pub const NEWEST_FIRST: &str = "-createdAt";

fn task_path(id: &RecordId) -> String {
    format!("/tasks/{}", urlencoding::encode(&id.to_string()))
}

fn decode_task(row: Value) -> Option<Task> {
    match serde_json::from_value::<Task>(row) {
        Ok(task) => Some(task),
        Err(e) => {
            warn!(error = %e, "Skipping task the server sent in an unknown shape");
            None
        }
    }
}

impl ApiClient {
    /// `GET /tasks?sort=<sort>`. Rows that do not decode as a task are
    /// skipped; a body that is not an array is an error.
    pub async fn list_tasks(&self, sort: &str) -> Result<Vec<Task>, ApiError> {
        let req = self.request(Method::GET, "/tasks")?.query(&[("sort", sort)]);
        let rows: Vec<Value> = self.send_json(req).await?;
        Ok(rows.into_iter().filter_map(decode_task).collect())
    }

    /// `POST /tasks`. The created record is not read back; callers refetch.
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError> {
        let req = self.request(Method::POST, "/tasks")?.json(draft);
        self.send_empty(req).await
    }

    /// `PUT /tasks/{id}`.
    pub async fn update_task(&self, id: &RecordId, draft: &TaskDraft) -> Result<(), ApiError> {
        let req = self.request(Method::PUT, &task_path(id))?.json(draft);
        self.send_empty(req).await
    }

    /// `DELETE /tasks/{id}`.
    pub async fn delete_task(&self, id: &RecordId) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, &task_path(id))?;
        self.send_empty(req).await
    }

    /// `PATCH /tasks/{id}/toggle`, flipping `completed`.
    pub async fn toggle_task(&self, id: &RecordId) -> Result<(), ApiError> {
        let req = self.request(Method::PATCH, &format!("{}/toggle", task_path(id)))?;
        self.send_empty(req).await
    }
}
