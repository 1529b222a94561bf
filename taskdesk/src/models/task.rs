//! Task model and the client-side task list filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{lenient, RecordId};

/// Priority of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Unknown or mistyped priorities read as the default.
fn lenient_priority<'de, D: Deserializer<'de>>(de: D) -> Result<Priority, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Priority::parse(&s).unwrap_or_default(),
        _ => Priority::default(),
    })
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A task owned by the logged-in user.
///
/// Only `id` and `title` are required. Dates may be full timestamps, bare
/// `YYYY-MM-DD` dates or epoch millis; anything unreadable is treated as
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub completed: bool,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Description if it carries any text.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// Body of a create or update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// `YYYY-MM-DD`, or empty for no due date.
    pub due_date: String,
}

impl TaskDraft {
    /// Seed a draft from an existing task, as the edit form does.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            due_date: task
                .due_date
                .map(|d| d.date_naive().format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Which tasks the list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    /// Whether `task` passes the filter.
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// Message shown when nothing passes the filter.
    pub const fn empty_message(self) -> &'static str {
        match self {
            Self::All => "No tasks yet. Create your first task above!",
            Self::Completed => "No completed tasks yet.",
            Self::Pending => "No pending tasks. Great job!",
        }
    }

    /// Keep only the tasks passing the filter, preserving order.
    pub fn apply(self, tasks: &[Task]) -> Vec<&Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

#[cfg(test)]
pub(crate) fn sample_task(id: i64, title: &str, priority: Priority, completed: bool) -> Task {
    Task {
        id: RecordId::Number(id),
        title: title.to_string(),
        description: None,
        priority,
        completed,
        due_date: None,
        created_at: None,
    }
}
