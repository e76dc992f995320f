//! HTTP client for the Jotter note API.
//!
//! Provides a minimal client with bearer-token auth, generic
//! GET/POST/PUT/PATCH/DELETE helpers, and domain methods (login, notes,
//! temporary storage credentials). The token store is an injected
//! dependency, so embedders decide where the token lives and tests run
//! without touching the environment. An unauthorized response clears the
//! stored token and fires the optional hook before the error surfaces.

pub mod api;
pub mod token;

use anyhow::{Context, Result};
use jotter_core::ClientConfig;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Invoked when the API answers 401, after the stored token is cleared.
pub type UnauthorizedHook = dyn Fn() + Send + Sync;

/// HTTP client for the Jotter API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    on_unauthorized: Option<Arc<UnauthorizedHook>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            on_unauthorized: None,
        })
    }

    /// Create a client from [`ClientConfig`]: file-backed token storage
    /// when a token path is configured, in-memory otherwise.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let tokens: Arc<dyn TokenStore> = match &config.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(MemoryTokenStore::default()),
        };
        Self::new(config.api_url.clone(), config.http_timeout, tokens)
    }

    pub fn with_unauthorized_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.token() {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // The stored token is no longer valid; the app has to log in
            // again before it can retry.
            if let Err(error) = self.tokens.clear() {
                tracing::warn!(error = %error, "failed to clear stored token");
            }
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut request = self.apply_auth(self.client.get(self.build_url(path)));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send_json(request).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        self.send_json(request).await
    }

    /// PUT JSON body and deserialize response.
    pub async fn put_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.apply_auth(self.client.put(self.build_url(path)).json(body));
        self.send_json(request).await
    }

    /// PATCH JSON body and deserialize response.
    pub async fn patch_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.apply_auth(self.client.patch(self.build_url(path)).json(body));
        self.send_json(request).await
    }

    /// DELETE request. Deserializes JSON response.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.apply_auth(self.client.delete(self.build_url(path)));
        self.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_joins_base_and_path() {
        let client = ApiClient::new(
            "http://localhost:3000/",
            Duration::from_secs(10),
            Arc::new(MemoryTokenStore::default()),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(
            client.build_url("/api/note/1"),
            "http://localhost:3000/api/note/1"
        );
    }
}
