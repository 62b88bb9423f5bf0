//! Suite configuration.
//!
//! One JSON document loaded at startup drives the whole run: which browser
//! to launch, where the application lives, wait budgets, report styling and
//! the test-data file locations. Nothing else in the crate reads files or
//! environment variables for configuration.

use crate::result::{VenderError, VenderResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// HTML report color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTheme {
    /// Light chrome, dark text
    #[default]
    Standard,
    /// Dark chrome, light text
    Dark,
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    /// Directory the HTML report is written into
    pub dir: PathBuf,
    /// File name of the report document
    pub file_name: String,
    /// Report name shown in the summary header
    pub name: String,
    /// Browser window title of the report
    pub title: String,
    /// Color theme
    pub theme: ReportTheme,
    /// `chrono` format string for timestamps in the report
    pub timestamp_format: String,
    /// Open the report in the platform viewer when the run ends
    pub open_when_done: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
            file_name: "vender-report.html".to_string(),
            name: "Vender Regression".to_string(),
            title: "Vender Test Report".to_string(),
            theme: ReportTheme::Standard,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            open_when_done: false,
        }
    }
}

impl ReportConfig {
    /// Full path of the HTML document.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Login credentials for the application under test
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Top-level suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuiteConfig {
    /// Browser identifier: `chrome`, `firefox` or `edge`
    pub browser: String,
    /// WebDriver endpoint, e.g. a chromedriver or Selenium URL
    pub webdriver_url: String,
    /// Application URL the session navigates to first
    pub base_url: String,
    /// Launch chrome in incognito mode
    pub incognito: bool,
    /// Page-load timeout, seconds
    pub page_load_timeout_secs: u64,
    /// Driver-side implicit wait, seconds
    pub implicit_wait_secs: u64,
    /// Default budget for explicit waits, seconds
    pub max_wait_secs: u64,
    /// Polling cadence of explicit waits, milliseconds
    pub poll_interval_ms: u64,
    /// Report output settings
    pub report: ReportConfig,
    /// Directory failure screenshots are written into
    pub screenshot_dir: PathBuf,
    /// Login credentials
    pub credentials: Credentials,
    /// Static per-screen test data document
    pub test_data_file: PathBuf,
    /// Per-run unique data document, rewritten by the setup scenario
    pub unique_data_file: PathBuf,
    /// `chrono` format for dates typed into the UI, e.g. `%m/%d/%Y`
    pub date_format: String,
    /// Month offset applied when computing a default close date
    pub months_to_add: u32,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            browser: "chrome".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            base_url: String::new(),
            incognito: true,
            page_load_timeout_secs: 60,
            implicit_wait_secs: 10,
            max_wait_secs: 60,
            poll_interval_ms: 1000,
            report: ReportConfig::default(),
            screenshot_dir: PathBuf::from("screenshots"),
            credentials: Credentials::default(),
            test_data_file: PathBuf::from("testdata/test-data.json"),
            unique_data_file: PathBuf::from("testdata/unique-data.json"),
            date_format: "%m/%d/%Y".to_string(),
            months_to_add: 1,
        }
    }
}

impl SuiteConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> VenderResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VenderError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            VenderError::config(format!("cannot parse {}: {e}", path.display()))
        })
    }

    /// Default explicit-wait budget.
    #[must_use]
    pub const fn explicit_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    /// Polling cadence for explicit waits.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Page-load budget.
    #[must_use]
    pub const fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    /// Driver-side implicit wait.
    #[must_use]
    pub const fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait_secs)
    }
}
