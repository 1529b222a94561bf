//! Session transitions.
//!
//! `reduce` is the only place a [`Session`] changes. It performs no I/O and
//! does not look inside payloads.

use crate::models::{Session, User};

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// A login, registration or session restore succeeded.
    LoginSuccess { user: User },
    /// The user logged out or the stored session was rejected.
    Logout,
    /// A session-affecting request started or finished.
    SetLoading(bool),
    /// A login or registration failed with this message.
    SetError(String),
    /// The user dismissed the error.
    ClearError,
}

impl AuthAction {
    /// Short name used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LoginSuccess { .. } => "LOGIN_SUCCESS",
            Self::Logout => "LOGOUT",
            Self::SetLoading(_) => "SET_LOADING",
            Self::SetError(_) => "SET_ERROR",
            Self::ClearError => "CLEAR_ERROR",
        }
    }
}

/// Compute the state after `action`.
pub fn reduce(state: &Session, action: AuthAction) -> Session {
    match action {
        AuthAction::LoginSuccess { user } => Session {
            is_authenticated: true,
            user: Some(user),
            loading: false,
            error: None,
        },
        AuthAction::Logout => Session::logged_out(),
        AuthAction::SetLoading(loading) => Session {
            loading,
            ..state.clone()
        },
        AuthAction::SetError(message) => Session {
            error: Some(message),
            loading: false,
            ..state.clone()
        },
        AuthAction::ClearError => Session {
            error: None,
            ..state.clone()
        },
    }
}
