//! Terminal views over the session and the task API.
//!
//! Rendering functions are pure and return the text to print; the async
//! helpers wrap API calls and map failures to the messages users see.

mod dashboard;
mod navbar;
mod profile;
mod task_list;

pub use dashboard::{fetch_dashboard, render_dashboard, DashboardStats, RECENT_LIMIT};
pub use navbar::{render_navbar, Section};
pub use profile::{render_profile, update_profile, PROFILE_UPDATED};
pub use task_list::{
    delete_task, fetch_tasks, format_task, render_task_list, save_task, toggle_task,
};

use crate::models::Session;

/// Shown while auth status is unknown.
pub const LOADING: &str = "Loading...";

/// A user-visible failure of a view action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ActionError(pub String);

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// The loading placeholder while a session-affecting request is in flight.
pub const fn loading_placeholder(session: &Session) -> Option<&'static str> {
    if session.loading {
        Some(LOADING)
    } else {
        None
    }
}
