//! Driver abstraction.
//!
//! Everything above this layer talks to the browser through the [`Driver`]
//! trait: a synchronous, blocking surface over exactly the operations the
//! suite needs. Two implementations exist: [`crate::fake::FakeDriver`] for
//! browserless tests and, behind the `webdriver` feature, a real WebDriver
//! backend in [`crate::webdriver`].

use crate::result::{VenderError, VenderResult};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// DRIVER KIND
// =============================================================================

/// Supported browsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    Chrome,
    Firefox,
    Edge,
}

impl DriverKind {
    /// Canonical config identifier for this browser.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
        }
    }
}

impl FromStr for DriverKind {
    type Err = VenderError;

    /// Parse a config identifier, case-insensitively. Anything unknown is
    /// rejected before a session is created.
    fn from_str(s: &str) -> VenderResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "edge" => Ok(Self::Edge),
            other => Err(VenderError::UnsupportedBrowser {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// LOCATORS
// =============================================================================

/// Element locator, by CSS selector or XPath expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    /// CSS selector locator.
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// XPath expression locator.
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// The raw selector or expression text.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v) | Self::XPath(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(v) => write!(f, "css={v}"),
            Self::XPath(v) => write!(f, "xpath={v}"),
        }
    }
}

/// Keys the suite sends beyond plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Escape,
}

// =============================================================================
// ELEMENT HANDLE
// =============================================================================

/// Opaque reference to an element held by a driver.
///
/// Handles are only meaningful to the driver that produced them and go stale
/// when the underlying node leaves the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    id: u64,
}

impl ElementHandle {
    /// Create a handle for a driver-internal node id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    /// Driver-internal node id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.id)
    }
}

// =============================================================================
// DRIVER TRAIT
// =============================================================================

/// Synchronous browser driver surface.
///
/// All methods take `&self`; implementations use interior mutability so a
/// single shared reference can flow through the page objects. Frame switches
/// affect subsequent document-level queries until [`Driver::leave_frame`].
pub trait Driver {
    // Navigation and document state
    fn navigate(&self, url: &str) -> VenderResult<()>;
    fn current_url(&self) -> VenderResult<String>;
    fn title(&self) -> VenderResult<String>;
    /// `document.readyState`; fails with [`VenderError::NoWindow`] when the
    /// browsing context is gone.
    fn ready_state(&self) -> VenderResult<String>;

    // Lookup
    fn find(&self, locator: &Locator) -> VenderResult<ElementHandle>;
    fn find_all(&self, locator: &Locator) -> VenderResult<Vec<ElementHandle>>;
    /// `document.querySelector` at the current browsing context; `None` when
    /// nothing matches (unlike [`Driver::find`], which is an error).
    fn document_query(&self, css: &str) -> VenderResult<Option<ElementHandle>>;

    // Element state
    fn is_displayed(&self, element: &ElementHandle) -> VenderResult<bool>;
    fn is_enabled(&self, element: &ElementHandle) -> VenderResult<bool>;
    fn text(&self, element: &ElementHandle) -> VenderResult<String>;
    fn attribute(&self, element: &ElementHandle, name: &str) -> VenderResult<Option<String>>;

    // Interaction
    fn click(&self, element: &ElementHandle) -> VenderResult<()>;
    /// Script-level click, for targets a trusted click cannot reach.
    fn js_click(&self, element: &ElementHandle) -> VenderResult<()>;
    fn clear(&self, element: &ElementHandle) -> VenderResult<()>;
    fn type_text(&self, element: &ElementHandle, text: &str) -> VenderResult<()>;
    fn press_key(&self, element: &ElementHandle, key: Key) -> VenderResult<()>;
    /// Script-level value assignment, bypassing key events.
    fn js_set_value(&self, element: &ElementHandle, value: &str) -> VenderResult<()>;
    fn scroll_into_view(&self, element: &ElementHandle) -> VenderResult<()>;
    fn hover(&self, element: &ElementHandle) -> VenderResult<()>;
    fn js_focus(&self, element: &ElementHandle) -> VenderResult<()>;
    fn active_element(&self) -> VenderResult<ElementHandle>;
    /// Send TAB to whatever currently has focus.
    fn send_tab(&self) -> VenderResult<()>;

    // Shadow DOM: descend exactly one shadow boundary from a host element.
    fn shadow_query(
        &self,
        host: &ElementHandle,
        css: &str,
    ) -> VenderResult<Option<ElementHandle>>;
    fn shadow_query_all(
        &self,
        host: &ElementHandle,
        css: &str,
    ) -> VenderResult<Vec<ElementHandle>>;

    // Frames
    fn enter_frame(&self, element: &ElementHandle) -> VenderResult<()>;
    fn leave_frame(&self) -> VenderResult<()>;

    // Session
    fn screenshot_png(&self) -> VenderResult<Vec<u8>>;
    fn quit(&self) -> VenderResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod driver_kind_tests {
        use super::*;

        #[test]
        fn supported_identifiers_parse() {
            assert_eq!("chrome".parse::<DriverKind>().unwrap(), DriverKind::Chrome);
            assert_eq!(
                "Firefox".parse::<DriverKind>().unwrap(),
                DriverKind::Firefox
            );
            assert_eq!(" EDGE ".parse::<DriverKind>().unwrap(), DriverKind::Edge);
        }

        #[test]
        fn unsupported_identifier_fails_fast_with_name() {
            let err = "safari".parse::<DriverKind>().unwrap_err();
            match err {
                VenderError::UnsupportedBrowser { name } => assert_eq!(name, "safari"),
                other => panic!("expected UnsupportedBrowser, got {other}"),
            }
        }

        #[test]
        fn display_round_trips_through_parse() {
            for kind in [DriverKind::Chrome, DriverKind::Firefox, DriverKind::Edge] {
                assert_eq!(kind.name().parse::<DriverKind>().unwrap(), kind);
            }
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn value_strips_strategy() {
            let loc = Locator::xpath("//a[@title='Home']");
            assert_eq!(loc.value(), "//a[@title='Home']");
            assert_eq!(loc.to_string(), "xpath=//a[@title='Home']");
        }

        #[test]
        fn css_and_xpath_with_same_text_differ() {
            assert_ne!(Locator::css("#x"), Locator::xpath("#x"));
        }
    }
}
