//! Client-side authentication: session reducer, store, facade, start-up
//! restore and the provider scope views read from.

mod bootstrap;
mod provider;
mod reducer;
mod service;
mod store;

pub use bootstrap::{bootstrap, BootstrapOutcome};
pub use provider::{try_use_auth, use_auth, AuthProvider};
pub use reducer::{reduce, AuthAction};
pub use service::{AuthService, LOGIN_FAILED, REGISTRATION_FAILED};
pub use store::SessionStore;

/// A login or registration attempt that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthFailure {
    /// Text to show the user.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("use_auth must be used within an AuthProvider")]
    MissingProvider,
}
