//! Vigil Harness
//!
//! Browser session lifecycle over the WebDriver wire protocol, failure
//! screenshot capture, report attachment sinks, and the module runner
//! that ties one shared session to a module of cases.
//!
//! Run the UI smoke suite with: cargo test --package vigil-harness --test ui_smoke

pub mod config;
pub mod error;
pub mod hook;
pub mod logging;
pub mod report;
pub mod runner;
pub mod session;
pub mod testkit;
pub mod webdriver;

pub use config::{BrowserConfig, ReportConfig, DEFAULT_WEBDRIVER_URL};
pub use error::{HarnessError, HarnessResult};
pub use hook::{CasePhase, FailureCapture, SCREENSHOT_LABEL, SCREENSHOT_MEDIA_TYPE};
pub use report::{DirSink, ManifestEntry, NullSink, ReportSink};
pub use runner::{
    Case, CaseContext, CaseFn, CaseFuture, CaseReport, CaseStatus, ModuleReport, ModuleRunner,
};
pub use session::Session;
pub use webdriver::{Browser, HttpTransport, WireTransport};

/// Harness version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
