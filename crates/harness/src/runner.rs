//! Module runner
//!
//! Runs a batch of cases against one shared browser session and turns
//! the outcomes into a serializable report. Panicking cases are caught
//! so later cases still run and the session is still released.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::BrowserConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::hook::{CasePhase, FailureCapture};
use crate::report::ReportSink;
use crate::session::Session;
use crate::webdriver::WireTransport;

/// Inputs shared by every case in a module
pub struct CaseContext {
    pub page_url: String,
}

pub type CaseFuture<'a> = Pin<Box<dyn Future<Output = HarnessResult<()>> + 'a>>;

/// A case body borrows the context and the shared session for its run
pub type CaseFn = for<'a> fn(&'a CaseContext, &'a Session) -> CaseFuture<'a>;

pub struct Case {
    pub name: &'static str,
    pub run: CaseFn,
}

impl Case {
    pub fn new(name: &'static str, run: CaseFn) -> Self {
        Self { name, run }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub name: String,
    pub status: CaseStatus,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot_attached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleReport {
    pub module: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub cases: Vec<CaseReport>,
}

impl ModuleReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Write the report as `<module>-report.json` under `dir`
    pub fn write_json(&self, dir: &Path) -> HarnessResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}-report.json", self.module));
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!("Report written to: {}", path.display());
        Ok(path)
    }
}

pub struct ModuleRunner<'a> {
    transport: Arc<dyn WireTransport>,
    config: BrowserConfig,
    sink: &'a dyn ReportSink,
}

impl<'a> ModuleRunner<'a> {
    pub fn new(
        transport: Arc<dyn WireTransport>,
        config: BrowserConfig,
        sink: &'a dyn ReportSink,
    ) -> Self {
        Self {
            transport,
            config,
            sink,
        }
    }

    /// Run every case in `cases` against one shared session
    ///
    /// The session is created before the first case and released after
    /// the last, whatever the individual outcomes were.
    pub async fn run_module(
        &self,
        module: &str,
        ctx: &CaseContext,
        cases: &[Case],
    ) -> HarnessResult<ModuleReport> {
        let session = Session::create(self.transport.clone(), &self.config).await?;
        let hook = FailureCapture::new(self.sink);

        info!("Running {} case(s) in module {}...", cases.len(), module);
        let module_start = Instant::now();
        let mut reports = Vec::with_capacity(cases.len());

        for case in cases {
            let start = Instant::now();
            let outcome = AssertUnwindSafe((case.run)(ctx, &session))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(HarnessError::CasePanicked(panic_text(panic)))
                });
            let duration_ms = start.elapsed().as_millis() as u64;

            let error = outcome.err().map(|e| e.to_string());
            let failed = error.is_some();

            // Evidence first, verdict after; the hook never changes the outcome.
            let screenshot_attached = hook
                .observe(case.name, CasePhase::Call, failed, Some(&session))
                .await;

            match &error {
                Some(message) => error!("✗ {} - {}", case.name, message),
                None => info!("✓ {} ({} ms)", case.name, duration_ms),
            }

            reports.push(CaseReport {
                name: case.name.to_string(),
                status: if failed {
                    CaseStatus::Failed
                } else {
                    CaseStatus::Passed
                },
                duration_ms,
                error,
                screenshot_attached,
            });
        }

        if let Err(e) = session.close().await {
            warn!("Browser session release failed: {}", e);
        }

        let passed = reports
            .iter()
            .filter(|r| r.status == CaseStatus::Passed)
            .count();
        let failed = reports.len() - passed;
        let duration_ms = module_start.elapsed().as_millis() as u64;
        info!("");
        info!(
            "Module {}: {} passed, {} failed ({} ms)",
            module, passed, failed, duration_ms
        );

        Ok(ModuleReport {
            module: module.to_string(),
            total: reports.len(),
            passed,
            failed,
            duration_ms,
            cases: reports,
        })
    }
}

fn panic_text(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
