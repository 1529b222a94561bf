//! `/auth` endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::models::User;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Body of a successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Body of `GET /auth/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

impl ApiClient {
    /// `POST /auth/login`.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let req = self
            .request(Method::POST, "/auth/login")?
            .json(&LoginRequest { email, password });
        self.send_json(req).await
    }

    /// `POST /auth/register`.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let req = self
            .request(Method::POST, "/auth/register")?
            .json(&RegisterRequest {
                name,
                email,
                password,
            });
        self.send_json(req).await
    }

    /// `GET /auth/me` with the stored token.
    pub async fn me(&self) -> Result<MeResponse, ApiError> {
        let req = self.request(Method::GET, "/auth/me")?;
        self.send_json(req).await
    }
}
