//! Measuring HTTP client for the `/users` resource
//!
//! The client is deliberately thin: no retries and no state shared
//! between calls. Every call returns the raw observables the suites
//! assert on (status, content type, body, measured latency) instead of
//! failing early on non-2xx responses.

use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::types::{NewUser, UserFilter};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One observed HTTP exchange
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub elapsed: Duration,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as UTF-8, for assertion messages
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Client for the users fixture API
#[derive(Debug, Clone)]
pub struct UsersClient {
    http: reqwest::Client,
    base_url: Url,
}

impl UsersClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut url = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        // Url::join drops the last path segment unless it ends in '/'
        if !url.path().ends_with('/') {
            url.set_path(&format!("{}/", url.path()));
        }

        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self { http, base_url: url })
    }

    /// List all users
    pub async fn list(&self) -> ClientResult<ApiResponse> {
        self.execute(Method::GET, "users", None, None).await
    }

    /// Fetch a single user by id
    pub async fn get(&self, id: u64) -> ClientResult<ApiResponse> {
        self.execute(Method::GET, &format!("users/{}", id), None, None)
            .await
    }

    /// List users matching the filter
    pub async fn search(&self, filter: &UserFilter) -> ClientResult<ApiResponse> {
        self.execute(Method::GET, "users", Some(filter), None).await
    }

    /// Create a user
    pub async fn create(&self, user: &NewUser) -> ClientResult<ApiResponse> {
        let body = serde_json::to_value(user)?;
        self.execute(Method::POST, "users", None, Some(body)).await
    }

    /// Update a user by id
    pub async fn update(&self, id: u64, user: &NewUser) -> ClientResult<ApiResponse> {
        let body = serde_json::to_value(user)?;
        self.execute(Method::PUT, &format!("users/{}", id), None, Some(body))
            .await
    }

    /// Delete a user by id
    pub async fn delete(&self, id: u64) -> ClientResult<ApiResponse> {
        self.execute(Method::DELETE, &format!("users/{}", id), None, None)
            .await
    }

    /// Base URL this client targets (always with a trailing slash)
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: Option<&UserFilter>,
        body: Option<serde_json::Value>,
    ) -> ClientResult<ApiResponse> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: format!("{}{}", self.base_url, path),
                reason: e.to_string(),
            })?;

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(filter) = query {
            request = request.query(filter);
        }
        if let Some(json) = &body {
            request = request.json(json);
        }

        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response.bytes().await?;
        let elapsed = start.elapsed();

        debug!("{} {} -> {} ({} ms)", method, url, status, elapsed.as_millis());

        Ok(ApiResponse {
            status,
            content_type,
            elapsed,
            body: bytes.to_vec(),
        })
    }
}
