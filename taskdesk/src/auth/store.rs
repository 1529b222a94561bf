//! Session store: current state plus the single dispatch entry point.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use super::reducer::{reduce, AuthAction};
use crate::models::Session;

type Listener = Arc<dyn Fn(&Session) + Send + Sync>;

/// Holds the current [`Session`].
///
/// State only changes through [`SessionStore::dispatch`]. Listeners run
/// synchronously after each transition; [`SessionStore::subscribe`] gives
/// async consumers a `watch` receiver instead.
pub struct SessionStore {
    state: watch::Sender<Session>,
    listeners: Mutex<Vec<Listener>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Store holding the start-up session (loading, logged out).
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self {
            state: tx,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the current session.
    pub fn get_state(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Apply `action` and notify listeners with the new state.
    pub fn dispatch(&self, action: AuthAction) {
        let kind = action.kind();
        self.state.send_modify(|state| *state = reduce(state, action));

        let snapshot = self.get_state();
        debug!(
            action = kind,
            authenticated = snapshot.is_authenticated,
            loading = snapshot.loading,
            has_error = snapshot.error.is_some(),
            "Session updated"
        );

        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Run `listener` after every dispatch.
    pub fn on_change(&self, listener: impl Fn(&Session) + Send + Sync + 'static) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    /// Receiver that observes every new state.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }
}
