//! API client for communicating with the COVA REST API.
//!
//! This module provides the `ApiClient` struct for making requests against
//! the configured backend, attaching the stored bearer token when present.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{SessionData, TokenStore};
use crate::config::Config;
use crate::models::{BookingRequest, Location, MenuItem, OrderRequest, SignupProfile};

use super::RequestError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds when none is configured.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const AUTH_TOKEN_PATH: &str = "/auth/token";
const AUTH_SIGNUP_PATH: &str = "/auth/signup";
const MENU_PATH: &str = "/menu";
const LOCATION_PATH: &str = "/location";
const BOOKINGS_PATH: &str = "/bookings";
const ORDERS_PATH: &str = "/orders";

/// API client for the restaurant backend.
/// Clone is cheap - reqwest::Client and the token store are both shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client against `base_url`
    pub fn new(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Result<Self> {
        Self::with_timeout(base_url, store, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        store: Arc<dyn TokenStore>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "API client configured");

        Ok(Self {
            client,
            base_url,
            store,
        })
    }

    /// Create a client from configuration, resolving the base address once
    pub fn from_config(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self> {
        Self::with_timeout(config.backend_url(), store, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a credential is currently stored
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.store.get_credential()?.is_some())
    }

    /// Drop the stored credential
    pub fn logout(&self) -> Result<()> {
        self.store.clear_credential()?;
        info!("Credential cleared");
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// JSON content type plus the bearer token, read fresh from the store
    fn request_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = self.store.get_credential()? {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .context("Stored token is not a valid header value")?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning a `RequestError` with the body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Request rejected");
            Err(RequestError::new(status, body).into())
        }
    }

    /// GET `path` and parse the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .headers(self.request_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// POST `payload` as JSON to `path` and parse the JSON body.
    pub async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(&url)
            .headers(self.request_headers()?)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// Sign in with a form-encoded `username`/`password` body.
    ///
    /// The returned token is stored only on success and only if present; a
    /// failed attempt leaves any stored credential alone.
    pub async fn authenticate(&self, identifier: &str, secret: &str) -> Result<SessionData> {
        let url = self.url(AUTH_TOKEN_PATH);

        let response = self
            .client
            .post(&url)
            .form(&[("username", identifier), ("password", secret)])
            .send()
            .await
            .context("Failed to send authentication request")?;

        let response = Self::check_response(response).await?;
        let body: Value = response
            .json()
            .await
            .context("Failed to parse auth response")?;
        let session = SessionData::from_value(body)?;

        match session.token() {
            Some(token) => {
                self.store.set_credential(token)?;
                info!("Signed in");
            }
            None => warn!("Auth response carried no access token"),
        }
        Ok(session)
    }

    /// Create an account. Stores the token if the backend returns one.
    pub async fn register(&self, profile: &SignupProfile) -> Result<SessionData> {
        let url = self.url(AUTH_SIGNUP_PATH);

        let response = self
            .client
            .post(&url)
            .json(profile)
            .send()
            .await
            .context("Failed to send signup request")?;

        let response = Self::check_response(response).await?;
        let body: Value = response
            .json()
            .await
            .context("Failed to parse signup response")?;
        let session = SessionData::from_value(body)?;

        if let Some(token) = session.token() {
            self.store.set_credential(token)?;
            info!("Account created and signed in");
        } else {
            info!("Account created");
        }
        Ok(session)
    }

    pub async fn fetch_menu(&self) -> Result<Vec<MenuItem>> {
        let menu: Vec<MenuItem> = self.get(MENU_PATH).await?;
        debug!(count = menu.len(), "Menu fetched");
        Ok(menu)
    }

    pub async fn fetch_location(&self) -> Result<Location> {
        self.get(LOCATION_PATH).await
    }

    pub async fn create_booking(&self, booking: &BookingRequest) -> Result<Value> {
        self.post(BOOKINGS_PATH, booking).await
    }

    pub async fn create_order(&self, order: &OrderRequest) -> Result<Value> {
        self.post(ORDERS_PATH, order).await
    }
}
