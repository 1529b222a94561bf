//! Dashboard: greeting, task counts and the most recent tasks.

use std::fmt::Write as _;

use tracing::warn;

use super::task_list::format_task;
use crate::api::{ApiClient, NEWEST_FIRST};
use crate::models::{Priority, Task, User};

/// How many recent tasks the dashboard lists.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high: usize,
}

impl DashboardStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
            high: tasks.iter().filter(|t| t.priority == Priority::High).count(),
        }
    }
}

/// Tasks for the dashboard. A failed fetch is logged and shows as no tasks.
pub async fn fetch_dashboard(api: &ApiClient) -> Vec<Task> {
    match api.list_tasks(NEWEST_FIRST).await {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(error = %e, "Error fetching dashboard data");
            Vec::new()
        }
    }
}

/// `tasks` must already be newest first.
pub fn render_dashboard(user: Option<&User>, tasks: &[Task]) -> String {
    let stats = DashboardStats::from_tasks(tasks);
    let name = user.map_or("there", User::display_name);

    let mut out = format!("Welcome back, {name}!\nHere's an overview of your tasks\n\n");
    let _ = writeln!(
        out,
        "Total: {}  Completed: {}  Pending: {}  High priority: {}",
        stats.total, stats.completed, stats.pending, stats.high
    );
    out.push_str("\nRecent Tasks\n");

    if tasks.is_empty() {
        out.push_str("No tasks yet. Run `taskdesk tasks add` to create your first task!\n");
        return out;
    }
    for task in tasks.iter().take(RECENT_LIMIT) {
        out.push_str(&format_task(task));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_task;

    fn tasks() -> Vec<Task> {
        vec![
            sample_task(1, "a", Priority::High, true),
            sample_task(2, "b", Priority::High, false),
            sample_task(3, "c", Priority::Low, false),
            sample_task(4, "d", Priority::Medium, true),
            sample_task(5, "e", Priority::Medium, false),
            sample_task(6, "f", Priority::Low, false),
        ]
    }

    #[test]
    fn counts_tasks() {
        assert_eq!(
            DashboardStats::from_tasks(&tasks()),
            DashboardStats {
                total: 6,
                completed: 2,
                pending: 4,
                high: 2,
            }
        );
        assert_eq!(DashboardStats::from_tasks(&[]), DashboardStats::default());
    }

    #[test]
    fn shows_at_most_five_recent_tasks() {
        let user: User = serde_json::from_str(r#"{"id":1,"name":"Ada"}"#).unwrap();
        let out = render_dashboard(Some(&user), &tasks());

        assert!(out.starts_with("Welcome back, Ada!"));
        assert!(out.contains("Total: 6  Completed: 2  Pending: 4  High priority: 2"));
        assert!(out.contains("] e  (5)"));
        assert!(!out.contains("] f  (6)"));
    }

    #[test]
    fn handles_missing_user_and_no_tasks() {
        let out = render_dashboard(None, &[]);
        assert!(out.starts_with("Welcome back, there!"));
        assert!(out.contains("No tasks yet."));
    }
}
