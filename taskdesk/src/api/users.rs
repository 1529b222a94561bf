//! `/users` endpoints.

use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, ApiError};

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

impl ApiClient {
    /// `PUT /users/profile`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        let req = self.request(Method::PUT, "/users/profile")?.json(update);
        self.send_empty(req).await
    }
}
