//! Session context.
//!
//! One [`Session`] owns everything a run needs: the driver, the config
//! snapshot, the reporter and the test-data stores. It is created once,
//! lent to every page object and scenario, and closed once. There is no
//! global state; two sessions in one process do not share anything.

use crate::config::SuiteConfig;
use crate::driver::Driver;
use crate::reporter::Reporter;
use crate::result::VenderResult;
use crate::shadow::ShadowResolver;
use crate::testdata::{TestData, UniqueDataStore};
use crate::wait::{WaitOptions, Waiter};
use std::path::PathBuf;
use tracing::{info, warn};

/// Owns the driver and run-wide services for one suite execution.
pub struct Session {
    config: SuiteConfig,
    driver: Box<dyn Driver>,
    reporter: Reporter,
    data: TestData,
    unique: UniqueDataStore,
    closed: bool,
}

impl Session {
    /// Open a session against a real browser. Fails fast on an unsupported
    /// browser identifier, before any WebDriver traffic.
    #[cfg(feature = "webdriver")]
    pub fn open(config: SuiteConfig) -> VenderResult<Self> {
        let driver = crate::webdriver::launch(&config)?;
        Self::with_driver(config, driver)
    }

    /// Build a session over an already-constructed driver.
    ///
    /// Loads the static test data named by the config; the driver is taken
    /// as-is, so browserless tests can pass a scripted fixture.
    pub fn with_driver(config: SuiteConfig, driver: Box<dyn Driver>) -> VenderResult<Self> {
        let data = TestData::load(&config.test_data_file)?;
        Ok(Self::assemble(config, driver, data))
    }

    /// Build a session with test data supplied directly.
    #[must_use]
    pub fn with_driver_and_data(
        config: SuiteConfig,
        driver: Box<dyn Driver>,
        data: TestData,
    ) -> Self {
        Self::assemble(config, driver, data)
    }

    fn assemble(config: SuiteConfig, driver: Box<dyn Driver>, data: TestData) -> Self {
        let reporter = Reporter::new(config.report.clone());
        let unique = UniqueDataStore::new(&config.unique_data_file);
        info!(browser = %config.browser, url = %config.base_url, "session ready");
        Self {
            config,
            driver,
            reporter,
            data,
            unique,
            closed: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    #[must_use]
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    #[must_use]
    pub fn data(&self) -> &TestData {
        &self.data
    }

    #[must_use]
    pub fn unique(&self) -> &UniqueDataStore {
        &self.unique
    }

    /// Wait budgets derived from the config.
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions::from_config(&self.config)
    }

    /// A wait engine over this session's driver.
    #[must_use]
    pub fn waiter(&self) -> Waiter<'_> {
        Waiter::new(self.driver(), self.wait_options())
    }

    /// A shadow resolver over this session's driver.
    #[must_use]
    pub fn resolver(&self) -> ShadowResolver<'_> {
        ShadowResolver::new(self.driver())
    }

    /// Capture a PNG into the configured screenshot directory.
    ///
    /// Failure narration must never mask the original failure, so problems
    /// here are logged and swallowed.
    pub fn capture_screenshot(&self, label: &str) -> Option<PathBuf> {
        let png = match self.driver.screenshot_png() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "screenshot capture failed");
                return None;
            }
        };
        let name = format!(
            "{}-{label}.png",
            chrono::Local::now().timestamp_millis()
        );
        let path = self.config.screenshot_dir.join(name);
        if let Err(e) = std::fs::create_dir_all(&self.config.screenshot_dir)
            .and_then(|()| std::fs::write(&path, png))
        {
            warn!(error = %e, "screenshot write failed");
            return None;
        }
        Some(path)
    }

    /// Quit the driver and flush the report. Always does both, then reports
    /// the first failure encountered.
    pub fn close(mut self) -> VenderResult<PathBuf> {
        self.closed = true;
        let quit = self.driver.quit();
        let report = self.reporter.flush();
        quit?;
        report
    }
}

impl Drop for Session {
    /// Backstop for early exits: an unfinished session still quits the
    /// browser and leaves a report behind.
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        warn!("session dropped without close(); quitting driver");
        if let Err(e) = self.driver.quit() {
            warn!(error = %e, "driver quit failed during drop");
        }
        if let Err(e) = self.reporter.flush() {
            warn!(error = %e, "report flush failed during drop");
        }
    }
}
