//! Browser session lifecycle over a WebDriver transport

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::BrowserConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::webdriver::{capabilities, WireTransport};

/// One live browser session
///
/// Created once per module run and shared by reference across the
/// module's cases. [`Session::close`] consumes the handle, so no case
/// can keep using the session after release.
pub struct Session {
    transport: Arc<dyn WireTransport>,
    id: String,
    closed: bool,
}

impl Session {
    /// Create a session and apply the implicit-wait timeout
    ///
    /// A session that fails timeout configuration is released before
    /// the error is returned; it never leaks to the caller.
    pub async fn create(
        transport: Arc<dyn WireTransport>,
        config: &BrowserConfig,
    ) -> HarnessResult<Self> {
        let value = transport
            .execute(Method::POST, "session", Some(capabilities(config)))
            .await?;

        let id = value
            .get("sessionId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                HarnessError::Protocol(format!("session response without sessionId: {}", value))
            })?
            .to_string();

        info!("Browser session {} created ({})", id, config.browser.as_str());

        let session = Self {
            transport,
            id,
            closed: false,
        };

        if let Err(e) = session.configure_timeouts(config.implicit_wait).await {
            warn!("Releasing half-configured session after timeout setup failure");
            if let Err(close_err) = session.close().await {
                warn!("Release of half-configured session failed: {}", close_err);
            }
            return Err(e);
        }

        Ok(session)
    }

    /// Navigate to an absolute URL
    pub async fn navigate(&self, url: &str) -> HarnessResult<()> {
        debug!("Session {} navigating to {}", self.id, url);
        self.transport
            .execute(
                Method::POST,
                &format!("session/{}/url", self.id),
                Some(json!({ "url": url })),
            )
            .await?;
        Ok(())
    }

    /// Current page title
    pub async fn title(&self) -> HarnessResult<String> {
        let value = self
            .transport
            .execute(Method::GET, &format!("session/{}/title", self.id), None)
            .await?;
        string_value(value, "title")
    }

    /// Current page URL
    pub async fn current_url(&self) -> HarnessResult<String> {
        let value = self
            .transport
            .execute(Method::GET, &format!("session/{}/url", self.id), None)
            .await?;
        string_value(value, "url")
    }

    /// PNG screenshot of the current page
    pub async fn screenshot_png(&self) -> HarnessResult<Vec<u8>> {
        let value = self
            .transport
            .execute(Method::GET, &format!("session/{}/screenshot", self.id), None)
            .await?;
        let encoded = value.as_str().ok_or_else(|| {
            HarnessError::Protocol(format!("screenshot response is not a string: {}", value))
        })?;
        Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
    }

    /// Session id assigned by the driver
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Release the session
    ///
    /// Consumes the handle; the driver-side delete is attempted exactly
    /// once even if it fails.
    pub async fn close(mut self) -> HarnessResult<()> {
        self.closed = true;
        let path = format!("session/{}", self.id);
        self.transport.execute(Method::DELETE, &path, None).await?;
        info!("Browser session {} released", self.id);
        Ok(())
    }

    async fn configure_timeouts(&self, implicit_wait: Duration) -> HarnessResult<()> {
        let millis = implicit_wait.as_millis() as u64;
        self.transport
            .execute(
                Method::POST,
                &format!("session/{}/timeouts", self.id),
                Some(json!({ "implicit": millis })),
            )
            .await?;
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                "Browser session {} dropped without close; the driver side may leak",
                self.id
            );
        }
    }
}

fn string_value(value: serde_json::Value, what: &str) -> HarnessResult<String> {
    value.as_str().map(|s| s.to_string()).ok_or_else(|| {
        HarnessError::Protocol(format!("{} response is not a string: {}", what, value))
    })
}
