//! HTTP client for the task-manager backend.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{extract_message, ApiError};
use crate::config::Config;
use crate::storage::KeyValueStore;

/// Thin wrapper over `reqwest` that knows the base URL and attaches the
/// stored bearer token to every request.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Client for `config.api_url` reading tokens from `store`.
    pub fn new(config: &Config, store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self::with_http(http, &config.api_url, store))
    }

    /// Client over a caller-provided `reqwest::Client`.
    pub fn with_http(
        http: reqwest::Client,
        base_url: &str,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Storage the client reads its token from.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request to `path`, with `Authorization` set when a token is stored.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path);
        debug!(%method, %url, "Sending request");

        let builder = self.http.request(method, url);
        Ok(match self.store.token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = self.send(builder).await?;
        let body = resp.text().await.map_err(ApiError::Transport)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send and discard whatever body comes back.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.send(builder).await.map(drop)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let resp = builder.send().await.map_err(ApiError::Transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = extract_message(&body);
        debug!(%status, message = ?message, "Request rejected");
        Err(ApiError::Status { status, message })
    }
}
