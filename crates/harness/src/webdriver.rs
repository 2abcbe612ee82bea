//! W3C WebDriver wire protocol
//!
//! Speaks the handful of REST commands the harness needs against a
//! running chromedriver or geckodriver. The transport is a trait so
//! the session lifecycle stays testable without a browser.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::BrowserConfig;
use crate::error::{HarnessError, HarnessResult};

/// Browser engines the harness can drive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
}

impl Browser {
    /// Map a command-line browser name; unknown names fall back to Chrome
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "firefox" => Browser::Firefox,
            _ => Browser::Chrome,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
        }
    }

    /// Vendor key for driver-specific options in the new-session payload
    fn options_key(&self) -> &'static str {
        match self {
            Browser::Chrome => "goog:chromeOptions",
            Browser::Firefox => "moz:firefoxOptions",
        }
    }
}

/// Build the `POST /session` capabilities payload for a config
pub fn capabilities(config: &BrowserConfig) -> serde_json::Value {
    let mut args: Vec<String> = Vec::new();

    match config.browser {
        Browser::Chrome => {
            if config.headless {
                args.push("--headless".to_string());
                args.push("--no-sandbox".to_string());
                args.push("--disable-dev-shm-usage".to_string());
                args.push("--disable-gpu".to_string());
            }
            args.push(format!(
                "--window-size={},{}",
                config.window_width, config.window_height
            ));
        }
        Browser::Firefox => {
            if config.headless {
                args.push("-headless".to_string());
            }
            args.push("-width".to_string());
            args.push(config.window_width.to_string());
            args.push("-height".to_string());
            args.push(config.window_height.to_string());
        }
    }

    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": config.browser.as_str(),
                config.browser.options_key(): { "args": args }
            }
        }
    })
}

/// Raw command transport to a WebDriver endpoint
///
/// `execute` returns the decoded `value` payload of the response
/// envelope; driver-reported errors surface as [`HarnessError::Driver`].
#[async_trait]
pub trait WireTransport: Send + Sync {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> HarnessResult<serde_json::Value>;

    /// Whether the endpoint answers status checks
    async fn ready(&self) -> bool;
}

/// Every WebDriver response wraps its payload in `{"value": ...}`
#[derive(Debug, Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    value: serde_json::Value,
}

/// HTTP transport to a real WebDriver endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for the endpoint; nothing is contacted until
    /// the first command
    pub fn new(endpoint: &str) -> HarnessResult<Self> {
        let mut url = Url::parse(endpoint).map_err(|e| HarnessError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        // Url::join drops the last path segment unless it ends in '/'
        if !url.path().ends_with('/') {
            url.set_path(&format!("{}/", url.path()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { http, endpoint: url })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl WireTransport for HttpTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> HarnessResult<serde_json::Value> {
        let url = self
            .endpoint
            .join(path)
            .map_err(|e| HarnessError::InvalidEndpoint {
                url: format!("{}{}", self.endpoint, path),
                reason: e.to_string(),
            })?;

        let mut request = self.http.request(method.clone(), url.clone());
        // Drivers require a JSON body on every POST, `{}` included
        if method == Method::POST {
            request = request.json(&body.unwrap_or_else(|| json!({})));
        }

        debug!("{} {}", method, url);
        let response = request.send().await?;
        let status = response.status();
        let envelope: WireEnvelope = response.json().await?;

        if status.is_success() {
            Ok(envelope.value)
        } else {
            Err(decode_driver_error(status, envelope.value))
        }
    }

    async fn ready(&self) -> bool {
        let Ok(url) = self.endpoint.join("status") else {
            return false;
        };
        match self
            .http
            .get(url)
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

fn decode_driver_error(status: StatusCode, value: serde_json::Value) -> HarnessError {
    match value.get("error").and_then(|v| v.as_str()) {
        Some(code) => HarnessError::Driver {
            error: code.to_string(),
            message: value
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
        },
        None => HarnessError::Protocol(format!("HTTP {} with payload: {}", status, value)),
    }
}
