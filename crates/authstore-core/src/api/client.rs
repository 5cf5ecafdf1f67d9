//! API client for the authentication backend.
//!
//! This module provides the `ApiClient` struct for the two calls the session
//! layer needs: exchanging credentials for tokens and fetching the user
//! profile behind an access token.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::models::{Credentials, User};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Login endpoint, relative to the API base URL
const LOGIN_PATH: &str = "/auth/login/";

/// Current-user endpoint, relative to the API base URL
const USER_PATH: &str = "/auth/user/";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Token pair issued by a successful login
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

/// Remote calls used by the session state.
///
/// Errors from either call carry an `ApiError` when the failure came from
/// the HTTP layer, so callers can downcast to inspect it.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for an access/refresh token pair
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair>;

    /// Fetch the profile of the user owning `token`
    async fn fetch_user(&self, token: &str) -> Result<User>;
}

/// HTTP implementation of `AuthApi`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair> {
        let url = self.url(LOGIN_PATH);
        debug!(url = %url, email = %credentials.email, "Sending login request");

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .context("Failed to parse login response")
    }

    async fn fetch_user(&self, token: &str) -> Result<User> {
        let url = self.url(USER_PATH);
        debug!(url = %url, "Fetching current user");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to send user request")?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .context("Failed to parse user response")
    }
}
