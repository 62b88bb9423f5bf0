//! Explicit waits.
//!
//! Every synchronization point in the suite goes through [`Waiter`]: poll a
//! condition on a fixed cadence until it holds or a deadline passes. Driver
//! faults raised while polling are all treated the same way, retried until
//! the deadline. Visibility waits report failure by absence (`None`) so call
//! sites decide whether a missing element is fatal; the invisibility and
//! page-load waits only ever warn.

use crate::config::SuiteConfig;
use crate::driver::{Driver, ElementHandle, Locator};
use crate::result::VenderError;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default polling cadence (1 second)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default wait budget (60 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 60_000;

/// Timeout and polling cadence for one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitOptions {
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Budgets from the suite configuration.
    #[must_use]
    pub const fn from_config(config: &SuiteConfig) -> Self {
        Self {
            timeout: config.explicit_wait(),
            poll_interval: config.poll_interval(),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// Polling wait engine over a driver.
pub struct Waiter<'a> {
    driver: &'a dyn Driver,
    options: WaitOptions,
}

impl<'a> Waiter<'a> {
    pub fn new(driver: &'a dyn Driver, options: WaitOptions) -> Self {
        Self { driver, options }
    }

    /// The configured default options.
    #[must_use]
    pub const fn options(&self) -> WaitOptions {
        self.options
    }

    /// Wait until the locator resolves to a displayed element.
    ///
    /// `None` after the deadline; the condition is checked once before the
    /// first sleep, so an already-visible element returns immediately.
    pub fn visible(&self, locator: &Locator) -> Option<ElementHandle> {
        self.visible_within(locator, self.options.timeout)
    }

    /// Visibility wait with an explicit timeout override.
    pub fn visible_within(&self, locator: &Locator, timeout: Duration) -> Option<ElementHandle> {
        let found = self.poll(timeout, || match self.driver.find(locator) {
            Ok(el) => match self.driver.is_displayed(&el) {
                Ok(true) => Some(el),
                Ok(false) => None,
                Err(e) => {
                    debug!(%locator, error = %e, "retrying visibility check");
                    None
                }
            },
            Err(e) => {
                debug!(%locator, error = %e, "retrying lookup");
                None
            }
        });
        if found.is_none() {
            warn!(%locator, timeout_ms = timeout.as_millis() as u64, "element never became visible");
        }
        found
    }

    /// Wait until the locator resolves to a displayed, enabled element.
    pub fn clickable(&self, locator: &Locator) -> Option<ElementHandle> {
        let found = self.poll(self.options.timeout, || match self.driver.find(locator) {
            Ok(el) => {
                let displayed = self.driver.is_displayed(&el).unwrap_or(false);
                let enabled = self.driver.is_enabled(&el).unwrap_or(false);
                (displayed && enabled).then_some(el)
            }
            Err(e) => {
                debug!(%locator, error = %e, "retrying lookup");
                None
            }
        });
        if found.is_none() {
            warn!(%locator, "element never became clickable");
        }
        found
    }

    /// Wait for the locator to stop matching a displayed element.
    ///
    /// Fire-and-forget: a deadline miss logs a warning and returns normally.
    pub fn invisible(&self, locator: &Locator) {
        let gone = self.poll(self.options.timeout, || {
            match self.driver.find(locator) {
                Ok(el) => match self.driver.is_displayed(&el) {
                    Ok(true) => None,
                    // Hidden, stale or unreadable all count as gone.
                    Ok(false) | Err(_) => Some(()),
                },
                Err(_) => Some(()),
            }
        });
        if gone.is_none() {
            warn!(%locator, "element still visible after wait; continuing");
        }
    }

    /// Wait for `document.readyState` to reach `complete`.
    ///
    /// A missing browsing context is tolerated as non-fatal; a deadline miss
    /// logs a warning. Never fails.
    pub fn page_loaded(&self) {
        let loaded = self.poll(self.options.timeout, || match self.driver.ready_state() {
            Ok(state) if state == "complete" => Some(()),
            Ok(state) => {
                debug!(%state, "document still loading");
                None
            }
            Err(VenderError::NoWindow) => {
                warn!("no browsing context while waiting for page load; continuing");
                Some(())
            }
            Err(e) => {
                debug!(error = %e, "retrying ready-state read");
                None
            }
        });
        if loaded.is_none() {
            warn!("page did not finish loading within the wait budget");
        }
    }

    /// Poll an arbitrary condition; `None` after the deadline.
    pub fn until<T>(&self, mut condition: impl FnMut() -> Option<T>) -> Option<T> {
        self.poll(self.options.timeout, || condition())
    }

    /// Core loop: attempt, then sleep-and-retry until `timeout` elapses.
    /// Worst case runs one attempt past the deadline, so total blocking time
    /// stays under `timeout + poll_interval`.
    fn poll<T>(&self, timeout: Duration, mut attempt: impl FnMut() -> Option<T>) -> Option<T> {
        let start = Instant::now();
        loop {
            if let Some(value) = attempt() {
                return Some(value);
            }
            if start.elapsed() >= timeout {
                return None;
            }
            std::thread::sleep(self.options.poll_interval);
        }
    }
}
