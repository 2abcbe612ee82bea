//! In-memory doubles for the transport and sink seams
//!
//! [`FakeTransport`] answers WebDriver commands without a driver
//! process and records everything it was asked, so lifecycle tests can
//! assert ordering and counts. [`RecordingSink`] and [`FailingSink`]
//! stand in for report sinks. Locks here use `unwrap` since a poisoned
//! lock in a test double should fail the test anyway.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Method;
use serde_json::{json, Value};

use crate::error::{HarnessError, HarnessResult};
use crate::report::ReportSink;
use crate::webdriver::WireTransport;

pub const FAKE_SESSION_ID: &str = "00000000-0000-4000-8000-000000000001";

/// One recorded wire command
#[derive(Debug, Clone)]
pub struct WireCommand {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

struct FailRule {
    method: Option<String>,
    needle: String,
}

impl FailRule {
    fn applies(&self, method: &str, path: &str) -> bool {
        self.method.as_deref().map_or(true, |m| m == method) && path.contains(&self.needle)
    }
}

/// Scriptable in-memory WebDriver endpoint
pub struct FakeTransport {
    commands: Mutex<Vec<WireCommand>>,
    sessions_created: AtomicUsize,
    sessions_deleted: AtomicUsize,
    title: Mutex<String>,
    current_url: Mutex<String>,
    screenshot: Mutex<Vec<u8>>,
    fail_rules: Mutex<Vec<FailRule>>,
    ready: AtomicBool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            sessions_created: AtomicUsize::new(0),
            sessions_deleted: AtomicUsize::new(0),
            title: Mutex::new("Vigil Fixture Console".to_string()),
            current_url: Mutex::new("about:blank".to_string()),
            screenshot: Mutex::new(vec![0x89, 0x50, 0x4E, 0x47]),
            fail_rules: Mutex::new(Vec::new()),
            ready: AtomicBool::new(true),
        }
    }

    /// Make every command whose path contains `needle` fail
    pub fn fail_on(&self, needle: &str) {
        self.fail_rules.lock().unwrap().push(FailRule {
            method: None,
            needle: needle.to_string(),
        });
    }

    /// Make commands with this method whose path contains `needle` fail
    pub fn fail_on_command(&self, method: &str, needle: &str) {
        self.fail_rules.lock().unwrap().push(FailRule {
            method: Some(method.to_uppercase()),
            needle: needle.to_string(),
        });
    }

    pub fn set_title(&self, title: &str) {
        *self.title.lock().unwrap() = title.to_string();
    }

    pub fn set_screenshot(&self, png: Vec<u8>) {
        *self.screenshot.lock().unwrap() = png;
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn commands(&self) -> Vec<WireCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Commands as `"METHOD path"` strings, in issue order
    pub fn command_paths(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }

    pub fn sessions_created(&self) -> usize {
        self.sessions_created.load(Ordering::SeqCst)
    }

    pub fn sessions_deleted(&self) -> usize {
        self.sessions_deleted.load(Ordering::SeqCst)
    }
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WireTransport for FakeTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> HarnessResult<Value> {
        self.commands.lock().unwrap().push(WireCommand {
            method: method.to_string(),
            path: path.to_string(),
            body: body.clone(),
        });

        // Scripted failures kick in before any state changes, so a
        // failed create never counts as a created session.
        let scripted = self
            .fail_rules
            .lock()
            .unwrap()
            .iter()
            .find(|rule| rule.applies(method.as_str(), path))
            .map(|rule| rule.needle.clone());
        if let Some(needle) = scripted {
            return Err(HarnessError::Driver {
                error: "fake failure".to_string(),
                message: format!("scripted failure for {}", needle),
            });
        }

        match (method.as_str(), path) {
            ("POST", "session") => {
                self.sessions_created.fetch_add(1, Ordering::SeqCst);
                Ok(json!({ "sessionId": FAKE_SESSION_ID, "capabilities": {} }))
            }
            ("DELETE", p) if p.starts_with("session/") => {
                self.sessions_deleted.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            }
            ("POST", p) if p.ends_with("/timeouts") => Ok(Value::Null),
            ("POST", p) if p.ends_with("/url") => {
                if let Some(url) = body.as_ref().and_then(|b| b.get("url")).and_then(|u| u.as_str())
                {
                    *self.current_url.lock().unwrap() = url.to_string();
                }
                Ok(Value::Null)
            }
            ("GET", p) if p.ends_with("/title") => Ok(json!(self.title.lock().unwrap().clone())),
            ("GET", p) if p.ends_with("/url") => {
                Ok(json!(self.current_url.lock().unwrap().clone()))
            }
            ("GET", p) if p.ends_with("/screenshot") => {
                let png = self.screenshot.lock().unwrap().clone();
                Ok(json!(base64::engine::general_purpose::STANDARD.encode(png)))
            }
            ("GET", "status") => Ok(json!({ "ready": self.ready.load(Ordering::SeqCst) })),
            _ => Err(HarnessError::Protocol(format!(
                "unhandled fake command: {} {}",
                method, path
            ))),
        }
    }

    async fn ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct RecordedAttachment {
    pub label: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Sink that keeps attachments in memory
#[derive(Default)]
pub struct RecordingSink {
    attachments: Mutex<Vec<RecordedAttachment>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachments(&self) -> Vec<RecordedAttachment> {
        self.attachments.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.attachments.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportSink for RecordingSink {
    fn attach(&self, bytes: &[u8], label: &str, media_type: &str) -> HarnessResult<()> {
        self.attachments.lock().unwrap().push(RecordedAttachment {
            label: label.to_string(),
            media_type: media_type.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}

/// Sink that rejects every attachment
pub struct FailingSink;

impl ReportSink for FailingSink {
    fn attach(&self, _bytes: &[u8], _label: &str, _media_type: &str) -> HarnessResult<()> {
        Err(HarnessError::Sink("attachment rejected".to_string()))
    }
}
