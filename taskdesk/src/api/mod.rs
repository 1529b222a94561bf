//! REST boundary: the HTTP client and one file per endpoint group.

mod auth;
mod client;
mod error;
mod tasks;
mod users;

pub use auth::{AuthResponse, MeResponse};
pub use client::ApiClient;
pub use error::ApiError;
pub use tasks::NEWEST_FIRST;
pub use users::ProfileUpdate;
