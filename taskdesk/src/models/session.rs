//! Client-side authentication session.

use serde::Serialize;

use super::User;

/// The client's current view of who is logged in.
///
/// Only the auth reducer produces new values of this type; everything else
/// reads snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// True iff a user is logged in.
    pub is_authenticated: bool,
    /// Present iff `is_authenticated`.
    pub user: Option<User>,
    /// A session-affecting request (bootstrap, login, register) is in flight.
    pub loading: bool,
    /// Last failure message, shown to the user until cleared.
    pub error: Option<String>,
}

impl Session {
    /// Logged-out session with nothing pending.
    pub const fn logged_out() -> Self {
        Self {
            is_authenticated: false,
            user: None,
            loading: false,
            error: None,
        }
    }

    /// `is_authenticated` and `user` agree with each other.
    pub const fn is_consistent(&self) -> bool {
        self.is_authenticated == self.user.is_some()
    }
}

impl Default for Session {
    /// State at process start: auth status unknown until bootstrap finishes.
    fn default() -> Self {
        Self {
            loading: true,
            ..Self::logged_out()
        }
    }
}
