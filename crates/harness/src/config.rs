//! Harness configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::webdriver::Browser;

/// Default WebDriver endpoint (chromedriver's standalone default)
pub const DEFAULT_WEBDRIVER_URL: &str = "http://127.0.0.1:9515";

/// Browser session configuration
///
/// Applied once at session acquisition; cases never reconfigure the
/// shared session.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub browser: Browser,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Implicit element-lookup wait sent to the driver right after
    /// session creation
    pub implicit_wait: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chrome,
            headless: true,
            window_width: 1920,
            window_height: 1080,
            implicit_wait: Duration::from_secs(10),
        }
    }
}

impl BrowserConfig {
    /// Headed variant for local debugging
    pub fn headed(mut self) -> Self {
        self.headless = false;
        self
    }
}

/// Report output configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("test-results"),
        }
    }
}
