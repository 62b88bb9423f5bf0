//! Vender: UI regression suite for a CRM quoting pipeline
//!
//! Drives a browser through the full quote-to-order flow: login, account,
//! contact, opportunity, quote, product selection inside a shadow-DOM line
//! editor, and logout. Scenarios run synchronously, narrate into an HTML
//! report, and share per-run record names through a small unique-data store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     VENDER Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌───────────┐   ┌──────────┐   ┌─────────┐  │
//! │  │ Scenario  │   │ Page      │   │ Driver   │   │ Browser │  │
//! │  │ Suite     │──►│ Objects   │──►│ trait    │──►│ (real / │  │
//! │  │           │   │ + Waits   │   │          │   │  fake)  │  │
//! │  └───────────┘   └───────────┘   └──────────┘   └─────────┘  │
//! │        │                                                     │
//! │        └──► Reporter ──► HTML report                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `webdriver` feature enables the real browser backend; without it the
//! crate builds against [`fake::FakeDriver`] only, which is enough for every
//! unit and integration test.

// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Suite configuration loaded from one JSON document.
pub mod config;
/// Synchronous driver abstraction shared by the real and fake backends.
pub mod driver;
/// In-memory DOM and driver for browserless tests.
pub mod fake;
/// Page objects for each screen of the flow.
pub mod pages;
/// Scenario narration and the HTML report.
pub mod reporter;
/// Error and result types.
pub mod result;
/// Session lifecycle: driver, reporter and data wired together.
pub mod session;
/// Declarative shadow-DOM traversal and the line-editor grid.
pub mod shadow;
/// The regression scenarios and the runner.
pub mod suite;
/// Static test data and the per-run unique-data store.
pub mod testdata;
/// Explicit-wait engine.
pub mod wait;
/// Real browser backend over the WebDriver protocol.
#[cfg(feature = "webdriver")]
pub mod webdriver;

pub use config::{Credentials, ReportConfig, ReportTheme, SuiteConfig};
pub use driver::{Driver, DriverKind, ElementHandle, Key, Locator};
pub use reporter::{Reporter, ScenarioStatus, Severity};
pub use result::{VenderError, VenderResult};
pub use session::Session;
pub use shadow::{ShadowPath, ShadowResolver};
pub use suite::{run_suite, scenarios, Scenario, SuiteSummary};
pub use testdata::{unique_string, TestData, UniqueDataStore};
pub use wait::{WaitOptions, Waiter};
