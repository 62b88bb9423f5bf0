//! Real WebDriver backend.
//!
//! [`thirtyfour`] is an async client; the suite is synchronous by design, so
//! this module owns a single-threaded tokio runtime and blocks on every
//! driver call. Element references returned by the remote end are kept in a
//! registry keyed by [`ElementHandle`] ids; the registry is dropped whenever
//! the browsing context changes, since the remote references go stale then
//! anyway.

use crate::config::SuiteConfig;
use crate::driver::{Driver, DriverKind, ElementHandle, Key, Locator};
use crate::result::{VenderError, VenderResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use thirtyfour::error::WebDriverError;
use thirtyfour::{By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver, WebElement};
use tokio::runtime::Runtime;
use tracing::{debug, info};

const SHADOW_QUERY_SCRIPT: &str = "\
    return arguments[0].shadowRoot \
    ? arguments[0].shadowRoot.querySelector(arguments[1]) : null;";

const SHADOW_QUERY_ALL_SCRIPT: &str = "\
    return arguments[0].shadowRoot \
    ? Array.from(arguments[0].shadowRoot.querySelectorAll(arguments[1])) : [];";

/// Start a browser session for the configured browser.
///
/// The browser identifier is validated first; nothing is sent to the
/// WebDriver endpoint for an unknown browser.
pub fn launch(config: &SuiteConfig) -> VenderResult<Box<dyn Driver>> {
    let kind: DriverKind = config.browser.parse()?;
    info!(browser = kind.name(), url = %config.webdriver_url, "starting browser session");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let driver = runtime
        .block_on(async {
            let driver = match kind {
                DriverKind::Chrome => {
                    let mut caps = DesiredCapabilities::chrome();
                    if config.incognito {
                        caps.add_arg("--incognito")?;
                    }
                    WebDriver::new(&config.webdriver_url, caps).await?
                }
                DriverKind::Firefox => {
                    WebDriver::new(&config.webdriver_url, DesiredCapabilities::firefox()).await?
                }
                DriverKind::Edge => {
                    WebDriver::new(&config.webdriver_url, DesiredCapabilities::edge()).await?
                }
            };
            driver
                .set_page_load_timeout(config.page_load_timeout())
                .await?;
            driver
                .set_implicit_wait_timeout(config.implicit_wait())
                .await?;
            driver.maximize_window().await?;
            driver.delete_all_cookies().await?;
            Ok::<_, WebDriverError>(driver)
        })
        .map_err(|e| map_err("session setup", e))?;

    Ok(Box::new(WebDriverBackend {
        runtime,
        driver,
        elements: RefCell::new(HashMap::new()),
        next_id: Cell::new(1),
    }))
}

struct Stored {
    element: WebElement,
    selector: String,
}

pub struct WebDriverBackend {
    runtime: Runtime,
    driver: WebDriver,
    elements: RefCell<HashMap<u64, Stored>>,
    next_id: Cell<u64>,
}

impl WebDriverBackend {
    fn block<F, T>(&self, fut: F) -> Result<T, WebDriverError>
    where
        F: Future<Output = Result<T, WebDriverError>>,
    {
        self.runtime.block_on(fut)
    }

    fn register(&self, element: WebElement, selector: &str) -> ElementHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.elements.borrow_mut().insert(
            id,
            Stored {
                element,
                selector: selector.to_string(),
            },
        );
        ElementHandle::new(id)
    }

    /// Remote references do not survive a context change.
    fn forget_all(&self) {
        self.elements.borrow_mut().clear();
    }

    fn resolve(&self, handle: &ElementHandle) -> VenderResult<(WebElement, String)> {
        self.elements
            .borrow()
            .get(&handle.id())
            .map(|stored| (stored.element.clone(), stored.selector.clone()))
            .ok_or_else(|| VenderError::StaleElement {
                selector: handle.to_string(),
            })
    }

    fn by(locator: &Locator) -> By {
        match locator {
            Locator::Css(css) => By::Css(css),
            Locator::XPath(xpath) => By::XPath(xpath),
        }
    }

    fn execute_on(
        &self,
        handle: &ElementHandle,
        script: &str,
    ) -> VenderResult<()> {
        let (element, selector) = self.resolve(handle)?;
        self.block(async {
            let arg = element.to_json()?;
            self.driver.execute(script, vec![arg]).await?;
            Ok(())
        })
        .map_err(|e| map_err(&selector, e))
    }
}

impl Driver for WebDriverBackend {
    fn navigate(&self, url: &str) -> VenderResult<()> {
        debug!(url, "navigate");
        self.forget_all();
        self.block(self.driver.goto(url))
            .map_err(|e| map_err(url, e))
    }

    fn current_url(&self) -> VenderResult<String> {
        self.block(async { Ok(self.driver.current_url().await?.to_string()) })
            .map_err(|e| map_err("current url", e))
    }

    fn title(&self) -> VenderResult<String> {
        self.block(self.driver.title())
            .map_err(|e| map_err("title", e))
    }

    fn ready_state(&self) -> VenderResult<String> {
        self.block(async {
            let ret = self
                .driver
                .execute("return document.readyState;", Vec::new())
                .await?;
            ret.convert::<String>()
        })
        .map_err(|e| map_err("document.readyState", e))
    }

    fn find(&self, locator: &Locator) -> VenderResult<ElementHandle> {
        let element = self
            .block(self.driver.find(Self::by(locator)))
            .map_err(|e| map_err(locator.value(), e))?;
        Ok(self.register(element, locator.value()))
    }

    fn find_all(&self, locator: &Locator) -> VenderResult<Vec<ElementHandle>> {
        let elements = self
            .block(self.driver.find_all(Self::by(locator)))
            .map_err(|e| map_err(locator.value(), e))?;
        Ok(elements
            .into_iter()
            .map(|element| self.register(element, locator.value()))
            .collect())
    }

    fn document_query(&self, css: &str) -> VenderResult<Option<ElementHandle>> {
        let mut elements = self
            .block(self.driver.find_all(By::Css(css)))
            .map_err(|e| map_err(css, e))?;
        if elements.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.register(elements.remove(0), css)))
    }

    fn is_displayed(&self, element: &ElementHandle) -> VenderResult<bool> {
        let (el, selector) = self.resolve(element)?;
        self.block(el.is_displayed())
            .map_err(|e| map_err(&selector, e))
    }

    fn is_enabled(&self, element: &ElementHandle) -> VenderResult<bool> {
        let (el, selector) = self.resolve(element)?;
        self.block(el.is_enabled())
            .map_err(|e| map_err(&selector, e))
    }

    fn text(&self, element: &ElementHandle) -> VenderResult<String> {
        let (el, selector) = self.resolve(element)?;
        self.block(el.text()).map_err(|e| map_err(&selector, e))
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> VenderResult<Option<String>> {
        let (el, selector) = self.resolve(element)?;
        self.block(el.attr(name)).map_err(|e| map_err(&selector, e))
    }

    fn click(&self, element: &ElementHandle) -> VenderResult<()> {
        let (el, selector) = self.resolve(element)?;
        debug!(%selector, "click");
        self.block(el.click()).map_err(|e| map_err(&selector, e))
    }

    fn js_click(&self, element: &ElementHandle) -> VenderResult<()> {
        self.execute_on(element, "arguments[0].click();")
    }

    fn clear(&self, element: &ElementHandle) -> VenderResult<()> {
        let (el, selector) = self.resolve(element)?;
        self.block(el.clear()).map_err(|e| map_err(&selector, e))
    }

    fn type_text(&self, element: &ElementHandle, text: &str) -> VenderResult<()> {
        let (el, selector) = self.resolve(element)?;
        self.block(el.send_keys(text))
            .map_err(|e| map_err(&selector, e))
    }

    fn press_key(&self, element: &ElementHandle, key: Key) -> VenderResult<()> {
        let (el, selector) = self.resolve(element)?;
        let mut text = String::new();
        text.push(key_char(key));
        self.block(el.send_keys(text))
            .map_err(|e| map_err(&selector, e))
    }

    fn js_set_value(&self, element: &ElementHandle, value: &str) -> VenderResult<()> {
        let (el, selector) = self.resolve(element)?;
        self.block(async {
            let arg = el.to_json()?;
            self.driver
                .execute(
                    "arguments[0].value = arguments[1];",
                    vec![arg, serde_json::Value::String(value.to_string())],
                )
                .await?;
            Ok(())
        })
        .map_err(|e| map_err(&selector, e))
    }

    fn scroll_into_view(&self, element: &ElementHandle) -> VenderResult<()> {
        let (el, selector) = self.resolve(element)?;
        self.block(el.scroll_into_view())
            .map_err(|e| map_err(&selector, e))
    }

    fn hover(&self, element: &ElementHandle) -> VenderResult<()> {
        let (el, selector) = self.resolve(element)?;
        self.block(
            self.driver
                .action_chain()
                .move_to_element_center(&el)
                .perform(),
        )
        .map_err(|e| map_err(&selector, e))
    }

    fn js_focus(&self, element: &ElementHandle) -> VenderResult<()> {
        self.execute_on(element, "arguments[0].focus();")
    }

    fn active_element(&self) -> VenderResult<ElementHandle> {
        let element = self
            .block(self.driver.active_element())
            .map_err(|e| map_err("document.activeElement", e))?;
        Ok(self.register(element, "document.activeElement"))
    }

    fn send_tab(&self) -> VenderResult<()> {
        self.block(async {
            let active = self.driver.active_element().await?;
            let mut text = String::new();
            text.push(key_char(Key::Tab));
            active.send_keys(text).await
        })
        .map_err(|e| map_err("document.activeElement", e))
    }

    fn shadow_query(
        &self,
        host: &ElementHandle,
        css: &str,
    ) -> VenderResult<Option<ElementHandle>> {
        let (el, _) = self.resolve(host)?;
        let found = self
            .block(async {
                let args = vec![el.to_json()?, serde_json::Value::String(css.to_string())];
                let ret = self.driver.execute(SHADOW_QUERY_SCRIPT, args).await?;
                if ret.json().is_null() {
                    Ok(None)
                } else {
                    ret.element().map(Some)
                }
            })
            .map_err(|e| map_err(css, e))?;
        Ok(found.map(|element| self.register(element, css)))
    }

    fn shadow_query_all(
        &self,
        host: &ElementHandle,
        css: &str,
    ) -> VenderResult<Vec<ElementHandle>> {
        let (el, _) = self.resolve(host)?;
        let found = self
            .block(async {
                let args = vec![el.to_json()?, serde_json::Value::String(css.to_string())];
                let ret = self.driver.execute(SHADOW_QUERY_ALL_SCRIPT, args).await?;
                ret.elements()
            })
            .map_err(|e| map_err(css, e))?;
        Ok(found
            .into_iter()
            .map(|element| self.register(element, css))
            .collect())
    }

    fn enter_frame(&self, element: &ElementHandle) -> VenderResult<()> {
        let (el, selector) = self.resolve(element)?;
        debug!(%selector, "enter frame");
        let result = self.block(el.enter_frame());
        self.forget_all();
        result.map_err(|e| map_err(&selector, e))
    }

    fn leave_frame(&self) -> VenderResult<()> {
        debug!("leave frame");
        let result = self.block(self.driver.enter_default_frame());
        self.forget_all();
        result.map_err(|e| map_err("default frame", e))
    }

    fn screenshot_png(&self) -> VenderResult<Vec<u8>> {
        self.block(self.driver.screenshot_as_png())
            .map_err(|e| map_err("screenshot", e))
    }

    fn quit(&self) -> VenderResult<()> {
        info!("quitting browser session");
        self.forget_all();
        self.block(self.driver.clone().quit())
            .map_err(|e| map_err("quit", e))
    }
}

const fn key_char(key: Key) -> char {
    match key {
        Key::Enter => '\u{e007}',
        Key::Tab => '\u{e004}',
        Key::Escape => '\u{e00c}',
    }
}

fn map_err(context: &str, e: WebDriverError) -> VenderError {
    let message = e.to_string();
    match e {
        WebDriverError::NoSuchElement(_) => VenderError::ElementNotFound {
            selector: context.to_string(),
        },
        WebDriverError::StaleElementReference(_) => VenderError::StaleElement {
            selector: context.to_string(),
        },
        WebDriverError::ElementClickIntercepted(_) => VenderError::ClickIntercepted {
            selector: context.to_string(),
        },
        WebDriverError::ElementNotInteractable(_) => VenderError::NotInteractable {
            selector: context.to_string(),
        },
        WebDriverError::NoSuchWindow(_) => VenderError::NoWindow,
        WebDriverError::JavascriptError(_) | WebDriverError::ScriptTimeout(_) => {
            VenderError::Script { message }
        }
        _ => VenderError::Session { message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(error: &str) -> thirtyfour::error::WebDriverErrorInfo {
        serde_json::from_value(serde_json::json!({
            "state": error,
            "error": error,
            "value": {
                "message": error,
                "error": error,
                "stacktrace": null,
                "data": null,
            }
        }))
        .unwrap()
    }

    #[test]
    fn webdriver_faults_map_onto_suite_errors() {
        assert!(matches!(
            map_err("#save", WebDriverError::NoSuchElement(info("no such element"))),
            VenderError::ElementNotFound { selector } if selector == "#save"
        ));
        assert!(matches!(
            map_err("#save", WebDriverError::NoSuchWindow(info("no such window"))),
            VenderError::NoWindow
        ));
        assert!(matches!(
            map_err("#save", WebDriverError::Timeout("slow".to_string())),
            VenderError::Session { .. }
        ));
    }

    #[test]
    fn keys_use_webdriver_code_points() {
        assert_eq!(key_char(Key::Enter), '\u{e007}');
        assert_eq!(key_char(Key::Tab), '\u{e004}');
    }
}
