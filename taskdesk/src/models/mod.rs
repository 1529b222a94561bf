//! Data models shared by the API client, the auth core and the views.

mod lenient;
mod session;
mod task;
mod user;

pub use session::Session;
pub use task::{Priority, Task, TaskDraft, TaskFilter};
pub use user::{RecordId, User, UserValidationError};

#[cfg(test)]
pub(crate) use task::sample_task;
