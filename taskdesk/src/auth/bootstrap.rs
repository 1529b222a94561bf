//! One-time session restore at start-up.

use tracing::{debug, info, warn};

use super::reducer::AuthAction;
use super::service::AuthService;

/// How a bootstrap run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No stored token; nothing was sent.
    NoToken,
    /// The server confirmed the stored token.
    Restored,
    /// The server rejected the token (or could not be reached); storage was cleared.
    Expired,
}

/// Reconcile the persisted token with the server's idea of the current user.
///
/// A stored token is never trusted on its own: when one exists, `GET /auth/me`
/// decides. Any failure downgrades silently to logged out.
pub async fn bootstrap(service: &AuthService) -> BootstrapOutcome {
    let storage = service.api().store();
    let token = storage.token().unwrap_or_else(|e| {
        warn!(error = %e, "Could not read stored token");
        None
    });

    if token.is_none() {
        debug!("No stored token, starting logged out");
        service.session().dispatch(AuthAction::SetLoading(false));
        return BootstrapOutcome::NoToken;
    }

    let verified = match service.api().me().await {
        Ok(resp) => service
            .check_user(&resp.user)
            .map(|()| resp.user)
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match verified {
        Ok(user) => {
            info!(user = user.display_name(), "Restored session");
            service.session().dispatch(AuthAction::LoginSuccess { user });
            BootstrapOutcome::Restored
        }
        Err(reason) => {
            info!(%reason, "Stored session is no longer valid");
            if let Err(e) = storage.clear_session() {
                warn!(error = %e, "Failed to clear stored session");
            }
            service.session().dispatch(AuthAction::Logout);
            BootstrapOutcome::Expired
        }
    }
}
