//! Taskdesk - a terminal client for the task-manager REST backend.
//!
//! Architecture:
//! - `auth` owns the client-side session: a pure reducer, the store that
//!   applies it, the login/register/logout facade and start-up restore
//! - `api` is the only code that talks HTTP; `storage` the only code that
//!   persists the token and cached user
//! - `views` render the dashboard, task list, profile and navigation line
//! - `cli` wires it together for the `taskdesk` binary

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod models;
pub mod storage;
pub mod views;

#[cfg(test)]
mod test_server;
