//! Auth facade: turns network outcomes into session transitions and
//! caller-facing results.

use std::sync::Arc;

use tracing::{info, warn};

use super::reducer::AuthAction;
use super::store::SessionStore;
use super::AuthFailure;
use crate::api::{ApiClient, ApiError, AuthResponse};
use crate::models::{Session, User};
use crate::storage::KeyValueStore;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Login, registration, logout and error dismissal.
///
/// Failures never escape as errors: they become a `SetError` dispatch plus an
/// [`AuthFailure`] return value.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: Arc<SessionStore>,
    strict_user_validation: bool,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("api", &self.api)
            .field("strict_user_validation", &self.strict_user_validation)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            strict_user_validation: false,
        }
    }

    /// Reject user records failing [`User::validate`] at the trust boundary.
    #[must_use]
    pub const fn with_strict_user_validation(mut self, strict: bool) -> Self {
        self.strict_user_validation = strict;
        self
    }

    /// Snapshot of the current session.
    pub fn state(&self) -> Session {
        self.session.get_state()
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn storage(&self) -> &Arc<dyn KeyValueStore> {
        self.api.store()
    }

    /// Log in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthFailure> {
        self.session.dispatch(AuthAction::SetLoading(true));
        let outcome = self.api.login(email, password).await;
        self.complete(outcome, LOGIN_FAILED)
    }

    /// Create an account and log into it.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthFailure> {
        self.session.dispatch(AuthAction::SetLoading(true));
        let outcome = self.api.register(name, email, password).await;
        self.complete(outcome, REGISTRATION_FAILED)
    }

    fn complete(
        &self,
        outcome: Result<AuthResponse, ApiError>,
        fallback: &str,
    ) -> Result<(), AuthFailure> {
        let result = outcome
            .map_err(|e| {
                warn!(error = %e, "Authentication request failed");
                e.message_or(fallback)
            })
            .and_then(|resp| self.accept(resp, fallback));

        match result {
            Ok(user) => {
                info!(user = user.display_name(), "Logged in");
                self.session.dispatch(AuthAction::LoginSuccess { user });
                Ok(())
            }
            Err(message) => {
                self.session.dispatch(AuthAction::SetError(message.clone()));
                Err(AuthFailure { message })
            }
        }
    }

    /// Validate (when strict) and persist a successful auth response.
    fn accept(&self, resp: AuthResponse, fallback: &str) -> Result<User, String> {
        if let Err(e) = self.check_user(&resp.user) {
            warn!(error = %e, "Rejecting user record from server");
            return Err(fallback.to_string());
        }
        self.storage()
            .persist_session(&resp.token, &resp.user)
            .map_err(|e| {
                warn!(error = %e, "Failed to persist session");
                fallback.to_string()
            })?;
        Ok(resp.user)
    }

    pub(crate) fn check_user(&self, user: &User) -> Result<(), crate::models::UserValidationError> {
        if self.strict_user_validation {
            user.validate()
        } else {
            Ok(())
        }
    }

    /// Forget the persisted credentials and log out. No network call.
    pub fn logout(&self) {
        if let Err(e) = self.storage().clear_session() {
            warn!(error = %e, "Failed to clear stored session");
        }
        info!("Logged out");
        self.session.dispatch(AuthAction::Logout);
    }

    /// Dismiss the current error message.
    pub fn clear_error(&self) {
        self.session.dispatch(AuthAction::ClearError);
    }
}
