//! Profile view and update.

use chrono::NaiveDate;
use tracing::warn;

use super::ActionError;
use crate::api::{ApiClient, ProfileUpdate};
use crate::models::User;

pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
const FIELDS_REQUIRED: &str = "Please fill in all fields";
const UPDATE_FAILED: &str = "Error updating profile";

/// Account details. `today` stands in for a missing sign-up date.
pub fn render_profile(user: &User, today: NaiveDate) -> String {
    let since = user.created_at_date().unwrap_or(today);
    format!(
        "My Profile\n\nFull Name: {}\nEmail: {}\n\nAccount Information\nRole: {}\nMember since: {}\n",
        user.name.as_deref().unwrap_or("-"),
        user.email.as_deref().unwrap_or("-"),
        user.role.as_deref().unwrap_or("-"),
        since.format("%Y-%m-%d"),
    )
}

/// Send a profile update. Both fields must be non-blank.
///
/// The session's user is left as is; it refreshes on the next start.
pub async fn update_profile(api: &ApiClient, update: &ProfileUpdate) -> Result<(), ActionError> {
    if update.name.trim().is_empty() || update.email.trim().is_empty() {
        return Err(FIELDS_REQUIRED.into());
    }

    api.update_profile(update).await.map_err(|e| {
        warn!(error = %e, "Error updating profile");
        ActionError(e.message_or(UPDATE_FAILED))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStore;
    use crate::test_server::FakeBackend;

    fn update(name: &str, email: &str) -> ProfileUpdate {
        ProfileUpdate {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn member_since_falls_back_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let user: User = serde_json::from_str(r#"{"id":1,"name":"Ada","role":"admin"}"#).unwrap();

        let out = render_profile(&user, today);
        assert!(out.contains("Full Name: Ada"));
        assert!(out.contains("Email: -"));
        assert!(out.contains("Role: admin"));
        assert!(out.contains("Member since: 2025-01-02"));
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_locally() {
        let backend = FakeBackend::start().await;
        let api = backend.client(Arc::new(MemoryStore::new()));

        let err = update_profile(&api, &update("Ada", " ")).await.unwrap_err();
        assert_eq!(err, ActionError::from("Please fill in all fields"));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn server_message_or_fallback() {
        let backend = FakeBackend::start().await;
        let api = backend.client(Arc::new(MemoryStore::new()));

        backend.respond(
            "PUT",
            "/users/profile",
            400,
            Some(json!({"message": "Email already in use"})),
        );
        let err = update_profile(&api, &update("Ada", "a@b.com")).await.unwrap_err();
        assert_eq!(err.0, "Email already in use");

        backend.respond("PUT", "/users/profile", 500, None);
        let err = update_profile(&api, &update("Ada", "a@b.com")).await.unwrap_err();
        assert_eq!(err.0, "Error updating profile");
    }

    #[tokio::test]
    async fn sends_name_and_email() {
        let backend = FakeBackend::start().await;
        let api = backend.client(Arc::new(MemoryStore::new()));
        backend.respond("PUT", "/users/profile", 200, Some(json!({"user": {}})));

        update_profile(&api, &update("Ada", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(
            backend.requests()[0].json(),
            json!({"name": "Ada", "email": "ada@example.com"})
        );
    }
}
