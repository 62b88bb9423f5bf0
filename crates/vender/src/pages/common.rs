//! Interactions shared by every record screen.

use crate::driver::Locator;
use crate::result::{VenderError, VenderResult};
use crate::session::Session;
use crate::shadow::ShadowPath;

const SPINNER: &str = "//*[@class='indicatorContainer forceInlineSpinner darkened']";
const ACTION_BODY_HEADER: &str = "//div[@class='actionBody']//h2";
const SAVE_BUTTON: &str = "//div[@class='footer-full-width']//button[text()='Save']";
const NEXT_BUTTON: &str = "//div[@class='inlineFooter']//span[text()='Next']";
const ACCESSIBILITY_IFRAME: &str = "//iframe[@title='accessibility title']";

/// Spinner, dialog and footer interactions common to the record screens.
pub struct CommonActions<'a> {
    session: &'a Session,
}

impl<'a> CommonActions<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Block until the inline loading spinner is gone. Fire-and-forget; a
    /// spinner that never leaves only costs the wait budget.
    pub fn wait_for_spinner_gone(&self) {
        self.session.waiter().invisible(&Locator::xpath(SPINNER));
    }

    /// Header text of the open action dialog.
    pub fn action_header_text(&self) -> VenderResult<String> {
        self.wait_for_spinner_gone();
        let header = self
            .session
            .waiter()
            .visible(&Locator::xpath(ACTION_BODY_HEADER))
            .ok_or_else(|| VenderError::not_found("action dialog header"))?;
        self.session.driver().text(&header)
    }

    /// Compare the dialog header against the expected text.
    pub fn dialog_header_matches(&self, expected: &str) -> VenderResult<bool> {
        let actual = self.action_header_text()?;
        self.session
            .reporter()
            .info(format!("Dialog header expected '{expected}', saw '{actual}'"));
        Ok(actual == expected)
    }

    /// Script-click the dialog Save button and let the spinner settle.
    pub fn click_save(&self) -> VenderResult<()> {
        let save = self
            .session
            .waiter()
            .visible(&Locator::xpath(SAVE_BUTTON))
            .ok_or_else(|| VenderError::not_found("Save button"))?;
        self.session.driver().js_click(&save)?;
        self.session.reporter().info("Clicked Save");
        self.wait_for_spinner_gone();
        Ok(())
    }

    /// Script-click the dialog Next button and let the spinner settle.
    pub fn click_next(&self) -> VenderResult<()> {
        let next = self
            .session
            .waiter()
            .visible(&Locator::xpath(NEXT_BUTTON))
            .ok_or_else(|| VenderError::not_found("Next button"))?;
        self.session.driver().js_click(&next)?;
        self.session.reporter().info("Clicked Next");
        self.wait_for_spinner_gone();
        Ok(())
    }

    /// Primary field text of the record highlight panel for an entity label.
    pub fn primary_field_text(&self, entity_label: &str) -> VenderResult<String> {
        let locator = Locator::xpath(format!(
            "//*[@slot='entityLabel' and text()='{entity_label}']/../../following-sibling::slot//*[@slot='primaryField']"
        ));
        let field = self
            .session
            .waiter()
            .visible(&locator)
            .ok_or_else(|| {
                VenderError::not_found(format!("primary field for entity '{entity_label}'"))
            })?;
        self.session.driver().text(&field)
    }

    /// Switch the browsing context into the quoting iframe.
    pub fn enter_accessibility_iframe(&self) -> VenderResult<()> {
        self.wait_for_spinner_gone();
        let iframe = self
            .session
            .waiter()
            .visible(&Locator::xpath(ACCESSIBILITY_IFRAME))
            .ok_or_else(|| VenderError::not_found("accessibility iframe"))?;
        self.session.driver().enter_frame(&iframe)
    }

    /// Back to the top document.
    pub fn leave_iframe(&self) -> VenderResult<()> {
        self.session.driver().leave_frame()
    }

    /// Open a picklist dropdown and script-click one of its options.
    pub fn select_from_dropdown(
        &self,
        dropdown: &Locator,
        option: &Locator,
        what: &str,
    ) -> VenderResult<()> {
        let button = self
            .session
            .waiter()
            .visible(dropdown)
            .ok_or_else(|| VenderError::not_found(format!("{what} dropdown")))?;
        self.session.driver().scroll_into_view(&button)?;
        self.session.driver().js_click(&button)?;
        let entry = self
            .session
            .waiter()
            .visible(option)
            .ok_or_else(|| VenderError::not_found(format!("{what} option")))?;
        self.session.driver().js_click(&entry)?;
        self.session.reporter().info(format!("Selected {what}"));
        Ok(())
    }

    /// Type into a lookup combobox and pick the matching suggestion.
    /// The value goes in script-level; key events confuse these widgets.
    pub fn pick_from_combobox(
        &self,
        input: &Locator,
        text: &str,
        option: &Locator,
        what: &str,
    ) -> VenderResult<()> {
        let field = self
            .session
            .waiter()
            .visible(input)
            .ok_or_else(|| VenderError::not_found(format!("{what} combobox")))?;
        self.session.driver().scroll_into_view(&field)?;
        self.session.driver().js_click(&field)?;
        self.session.driver().js_set_value(&field, text)?;
        let suggestion = self
            .session
            .waiter()
            .visible(option)
            .ok_or_else(|| VenderError::not_found(format!("{what} suggestion '{text}'")))?;
        self.session.driver().js_click(&suggestion)?;
        self.session.reporter().info(format!("Selected {what}: {text}"));
        Ok(())
    }

    /// Route to the shadow-rendered spinner of the quoting UI.
    #[must_use]
    pub fn shadow_spinner_path() -> ShadowPath {
        ShadowPath::start("#sbPageContainer").then("#spinner").then(
            "#mask > div.slds-spinner--brand.slds-spinner.large > div.slds-spinner__dot-a",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::fake::{FakeDom, FakeDriver, FakeElement};
    use crate::testdata::TestData;
    use serde_json::json;

    fn fast_session(dom: FakeDom) -> (Session, FakeDriver) {
        let config = SuiteConfig {
            max_wait_secs: 1,
            poll_interval_ms: 5,
            ..SuiteConfig::default()
        };
        let driver = FakeDriver::with_dom(dom);
        let probe = driver.clone();
        let session = Session::with_driver_and_data(
            config,
            Box::new(driver),
            TestData::from_value(json!({})),
        );
        (session, probe)
    }

    #[test]
    fn header_text_reads_dialog() {
        let mut dom = FakeDom::new();
        dom.insert(
            FakeElement::new("h2")
                .selector(ACTION_BODY_HEADER)
                .text("New Account"),
        );
        let (session, _) = fast_session(dom);
        let common = CommonActions::new(&session);
        assert!(common.dialog_header_matches("New Account").unwrap());
        assert!(!common.dialog_header_matches("New Contact").unwrap());
    }

    #[test]
    fn missing_save_button_is_not_found() {
        let (session, _) = fast_session(FakeDom::new());
        let common = CommonActions::new(&session);
        assert!(matches!(
            common.click_save().unwrap_err(),
            VenderError::NotFound { .. }
        ));
    }

    #[test]
    fn save_click_goes_through_script() {
        let mut dom = FakeDom::new();
        dom.insert(FakeElement::new("button").selector(SAVE_BUTTON));
        let (session, probe) = fast_session(dom);
        CommonActions::new(&session).click_save().unwrap();
        assert!(probe.was_called(&format!("js_click {SAVE_BUTTON}")));
    }

    #[test]
    fn iframe_switch_enters_and_leaves() {
        let mut dom = FakeDom::new();
        dom.insert(FakeElement::new("iframe").selector(ACCESSIBILITY_IFRAME));
        let (session, probe) = fast_session(dom);
        let common = CommonActions::new(&session);
        common.enter_accessibility_iframe().unwrap();
        common.leave_iframe().unwrap();
        assert!(probe.was_called("enter_frame"));
        assert!(probe.was_called("leave_frame"));
    }
}
