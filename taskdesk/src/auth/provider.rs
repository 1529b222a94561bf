//! Provisioning scope for the auth surface.
//!
//! Views obtain the session and auth operations through [`use_auth`], which
//! only works inside [`AuthProvider::scope`]. Reading it anywhere else is a
//! programming error and fails immediately.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::bootstrap::{bootstrap, BootstrapOutcome};
use super::service::AuthService;
use super::store::SessionStore;
use super::AuthError;
use crate::api::ApiClient;

tokio::task_local! {
    static AUTH: AuthService;
}

/// Owns the session for the lifetime of the process.
#[derive(Debug)]
pub struct AuthProvider {
    service: AuthService,
    booted: AtomicBool,
}

impl AuthProvider {
    /// Provider with a fresh session store (auth status unknown).
    pub fn new(api: ApiClient, strict_user_validation: bool) -> Self {
        let service = AuthService::new(api, Arc::new(SessionStore::new()))
            .with_strict_user_validation(strict_user_validation);
        Self {
            service,
            booted: AtomicBool::new(false),
        }
    }

    pub const fn service(&self) -> &AuthService {
        &self.service
    }

    /// Restore the persisted session. Only the first call does anything;
    /// later calls return `None`.
    pub async fn bootstrap(&self) -> Option<BootstrapOutcome> {
        if self.booted.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(bootstrap(&self.service).await)
    }

    /// Run `fut` with the auth surface available to [`use_auth`].
    pub async fn scope<F: Future>(&self, fut: F) -> F::Output {
        AUTH.scope(self.service.clone(), fut).await
    }
}

/// The auth surface of the enclosing provider.
///
/// # Panics
///
/// Panics when called outside [`AuthProvider::scope`].
pub fn use_auth() -> AuthService {
    match try_use_auth() {
        Ok(service) => service,
        Err(e) => panic!("{e}"),
    }
}

/// Like [`use_auth`], but reports a missing provider as an error.
pub fn try_use_auth() -> Result<AuthService, AuthError> {
    AUTH.try_with(Clone::clone)
        .map_err(|_| AuthError::MissingProvider)
}
