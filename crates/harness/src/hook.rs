//! Failure capture hook
//!
//! Watches case outcomes and files a screenshot with the report sink
//! when a case body fails with a live browser session. Capture is
//! best-effort: a broken screenshot path is logged and swallowed so
//! the case verdict stands on its own.

use tracing::warn;

use crate::report::ReportSink;
use crate::session::Session;

pub const SCREENSHOT_LABEL: &str = "screenshot-on-failure";
pub const SCREENSHOT_MEDIA_TYPE: &str = "image/png";

/// Phase of a case the outcome belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePhase {
    Setup,
    Call,
    Teardown,
}

pub struct FailureCapture<'a> {
    sink: &'a dyn ReportSink,
}

impl<'a> FailureCapture<'a> {
    pub fn new(sink: &'a dyn ReportSink) -> Self {
        Self { sink }
    }

    /// Record a case outcome, attaching a screenshot when warranted
    ///
    /// Only a failure in the call phase with a session in hand triggers
    /// capture. Returns whether an attachment was filed.
    pub async fn observe(
        &self,
        case: &str,
        phase: CasePhase,
        failed: bool,
        session: Option<&Session>,
    ) -> bool {
        if phase != CasePhase::Call || !failed {
            return false;
        }
        let Some(session) = session else {
            return false;
        };

        let png = match session.screenshot_png().await {
            Ok(png) => png,
            Err(e) => {
                warn!("Failed to take screenshot for {}: {}", case, e);
                return false;
            }
        };

        match self.sink.attach(&png, SCREENSHOT_LABEL, SCREENSHOT_MEDIA_TYPE) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to attach screenshot for {}: {}", case, e);
                false
            }
        }
    }
}
