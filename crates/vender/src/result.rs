//! Result and error types for Vender.

use thiserror::Error;

/// Result type for Vender operations
pub type VenderResult<T> = Result<T, VenderError>;

/// Errors that can occur while driving the suite
#[derive(Debug, Error)]
pub enum VenderError {
    /// Browser identifier from config is not one we can launch
    #[error("Browser not supported: {name} (expected chrome, firefox or edge)")]
    UnsupportedBrowser {
        /// Identifier as it appeared in the config
        name: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// A wait gave up
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Condition that never held
        what: String,
    },

    /// A required record, key or UI entity does not exist
    #[error("Not found: {what}")]
    NotFound {
        /// Description of the missing thing
        what: String,
    },

    /// A scenario-level expectation did not hold
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// No element matched the locator
    #[error("No element matching {selector}")]
    ElementNotFound {
        /// Locator value that matched nothing
        selector: String,
    },

    /// Element handle refers to a node no longer in the document
    #[error("Stale element reference: {selector}")]
    StaleElement {
        /// Locator the handle was resolved from
        selector: String,
    },

    /// Another element would receive the click
    #[error("Click intercepted on {selector}")]
    ClickIntercepted {
        /// Locator the handle was resolved from
        selector: String,
    },

    /// Element is present but cannot be interacted with
    #[error("Element not interactable: {selector}")]
    NotInteractable {
        /// Locator the handle was resolved from
        selector: String,
    },

    /// The browsing context (window or frame) is gone
    #[error("Browsing context is no longer open")]
    NoWindow,

    /// Injected script failed to evaluate
    #[error("Script execution failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// WebDriver session-level failure
    #[error("Driver session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VenderError {
    /// Build a `Config` error from any message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Build a `NotFound` error from any description.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Build an `Assertion` error from any message.
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Element-level faults the wait engine keeps polling through.
    ///
    /// The distinction is informational only: the polling loops retry every
    /// error until their deadline, transient or not.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::StaleElement { .. }
                | Self::ClickIntercepted { .. }
                | Self::NotInteractable { .. }
        )
    }
}
