//! Quote record screen and the shadow-rendered line editor.

use crate::driver::Locator;
use crate::pages::CommonActions;
use crate::result::{VenderError, VenderResult};
use crate::session::Session;
use crate::shadow::ShadowPath;
use tracing::info;

const PROCEED_BUTTON: &str =
    "//div[contains(@class,'modal-footer')]//button[text()='Proceed']";
const START_DATE_INPUT: &str = "//input[@name='SBQQ__StartDate__c']";
const SOLD_TO_COMBOBOX: &str =
    "//label[text()='Sold To Contact']//following-sibling::div//input[@role='combobox']";
const BILL_TO_COMBOBOX: &str =
    "//label[text()='Bill To Contact']//following-sibling::div//input[@role='combobox']";
const SUBSCRIPTION_TERM_INPUT: &str = "//input[@name='SBQQ__SubscriptionTerm__c']";
const PAYMENT_OPTIONS_DROPDOWN: &str =
    "//*[@aria-label='Payment Options']//span[@part='input-button-value']";
const PAYMENT_TERMS_DROPDOWN: &str =
    "//*[@aria-label='Payment Terms']//span[@part='input-button-value']";
const BILLING_PERIOD_DROPDOWN: &str =
    "//*[@aria-label='Billing Period']//span[@part='input-button-value']";
const EDIT_LINES_BUTTON: &str =
    "//ul[@class='slds-button-group-list']//*[@title='Edit Lines']//button";

pub struct QuotePage<'a> {
    session: &'a Session,
    common: CommonActions<'a>,
}

impl<'a> QuotePage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            common: CommonActions::new(session),
        }
    }

    pub fn click_proceed(&self) -> VenderResult<()> {
        self.common.wait_for_spinner_gone();
        let button = self
            .session
            .waiter()
            .visible(&Locator::xpath(PROCEED_BUTTON))
            .ok_or_else(|| VenderError::not_found("Proceed button"))?;
        self.session.driver().js_click(&button)?;
        self.session.reporter().info("Clicked Proceed");
        Ok(())
    }

    pub fn is_dialog_header_correct(&self, expected: &str) -> VenderResult<bool> {
        self.common.dialog_header_matches(expected)
    }

    pub fn enter_start_date(&self, start_date: &str) -> VenderResult<()> {
        let input = self
            .session
            .waiter()
            .visible(&Locator::xpath(START_DATE_INPUT))
            .ok_or_else(|| VenderError::not_found("start date input"))?;
        self.session.driver().scroll_into_view(&input)?;
        self.session.driver().type_text(&input, start_date)?;
        self.session
            .reporter()
            .info(format!("Entered start date: {start_date}"));
        Ok(())
    }

    pub fn select_sold_to_contact(&self, contact_name: &str) -> VenderResult<()> {
        self.common.pick_from_combobox(
            &Locator::xpath(SOLD_TO_COMBOBOX),
            contact_name,
            &Locator::xpath(format!(
                "//label[text()='Sold To Contact']/..//div[@part='dropdown overlay']//span[contains(text(),'{contact_name}')]"
            )),
            "sold to contact",
        )
    }

    pub fn select_bill_to_contact(&self, contact_name: &str) -> VenderResult<()> {
        self.common.pick_from_combobox(
            &Locator::xpath(BILL_TO_COMBOBOX),
            contact_name,
            &Locator::xpath(format!(
                "//label[text()='Bill To Contact']/..//div[@part='dropdown overlay']//span[contains(text(),'{contact_name}')]"
            )),
            "bill to contact",
        )
    }

    pub fn enter_subscription_term(&self, term: &str) -> VenderResult<()> {
        let input = self
            .session
            .waiter()
            .visible(&Locator::xpath(SUBSCRIPTION_TERM_INPUT))
            .ok_or_else(|| VenderError::not_found("subscription term input"))?;
        self.session.driver().scroll_into_view(&input)?;
        self.session.driver().type_text(&input, term)?;
        self.session
            .reporter()
            .info(format!("Entered subscription term: {term}"));
        Ok(())
    }

    pub fn select_payment_option(&self, option: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(PAYMENT_OPTIONS_DROPDOWN),
            &Locator::xpath(format!(
                "//label[text()='Payment Options']/..//div[@part='dropdown overlay']//span[text()='{option}']"
            )),
            "payment option",
        )
    }

    pub fn select_payment_terms(&self, terms: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(PAYMENT_TERMS_DROPDOWN),
            &Locator::xpath(format!(
                "//label[text()='Payment Terms']/..//div[@part='dropdown overlay']//span[text()='{terms}']"
            )),
            "payment terms",
        )
    }

    pub fn select_billing_period(&self, period: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(BILLING_PERIOD_DROPDOWN),
            &Locator::xpath(format!(
                "//label[text()='Billing Period']/..//div[@part='dropdown overlay']//span[text()='{period}']"
            )),
            "billing period",
        )
    }

    pub fn click_save(&self) -> VenderResult<()> {
        self.common.click_save()
    }

    pub fn click_edit_lines(&self) -> VenderResult<()> {
        let button = self
            .session
            .waiter()
            .visible(&Locator::xpath(EDIT_LINES_BUTTON))
            .ok_or_else(|| VenderError::not_found("Edit Lines button"))?;
        self.session.driver().js_click(&button)?;
        self.session.reporter().info("Clicked Edit Lines");
        Ok(())
    }

    /// The quote name embeds the opportunity it was created from.
    pub fn is_quote_name_displayed(
        &self,
        entity_label: &str,
        opportunity_name: &str,
    ) -> VenderResult<bool> {
        let actual = self.common.primary_field_text(entity_label)?;
        self.session.reporter().info(format!(
            "Quote primary field: '{actual}', expecting fragment '{opportunity_name}'"
        ));
        Ok(actual.contains(opportunity_name))
    }

    // ------------------------------------------------------------------
    // Line-editor flows inside the quoting iframe
    // ------------------------------------------------------------------

    /// Open the product lookup from the line editor.
    pub fn click_add_products(&self) -> VenderResult<()> {
        self.common.wait_for_spinner_gone();
        self.common.enter_accessibility_iframe()?;
        let outcome = self
            .session
            .resolver()
            .resolve_required(&Self::add_products_path(), "Add Products button")
            .and_then(|button| self.session.driver().click(&button));
        self.common.leave_iframe()?;
        outcome?;
        self.session.reporter().info("Clicked Add Products");
        Ok(())
    }

    /// Change a line-item quantity through the shadow grid.
    pub fn edit_product_quantity(
        &self,
        product_name: &str,
        quantity: &str,
        hover_first: bool,
    ) -> VenderResult<()> {
        self.common.enter_accessibility_iframe()?;
        let outcome =
            self.session
                .resolver()
                .edit_product_quantity(product_name, quantity, hover_first);
        self.common.leave_iframe()?;
        outcome?;
        self.session.reporter().info(format!(
            "Edited quantity of {product_name} to {quantity}"
        ));
        Ok(())
    }

    /// Save the edited lines.
    ///
    /// A save that raises the error toast is retried exactly once after
    /// dismissing the toast; a second failure propagates.
    pub fn click_save_in_iframe(&self) -> VenderResult<()> {
        self.common.enter_accessibility_iframe()?;
        let outcome = self.save_with_toast_retry();
        self.common.leave_iframe()?;
        outcome?;
        self.session.reporter().info("Saved edited products");
        Ok(())
    }

    /// Dismiss the product alert dialog the save can leave behind.
    pub fn click_close_in_alert(&self) -> VenderResult<()> {
        self.common.enter_accessibility_iframe()?;
        self.session.waiter().page_loaded();
        let outcome = self
            .session
            .resolver()
            .resolve_required(&Self::alert_close_path(), "alert Close button")
            .and_then(|button| self.session.driver().js_click(&button));
        self.common.wait_for_spinner_gone();
        self.common.leave_iframe()?;
        outcome?;
        self.session.reporter().info("Closed product alert dialog");
        Ok(())
    }

    fn save_with_toast_retry(&self) -> VenderResult<()> {
        let resolver = self.session.resolver();
        let save_path = Self::save_button_path();
        let save = self
            .session
            .waiter()
            .until(|| resolver.resolve(&save_path).ok().flatten())
            .ok_or_else(|| VenderError::not_found("line-editor Save button"))?;
        self.session.driver().click(&save)?;

        if let Some(close) = resolver.resolve(&Self::error_toast_close_path())? {
            info!("save raised an error toast; dismissing and retrying once");
            self.session
                .reporter()
                .warn("Save raised an error toast; retrying once");
            self.session.driver().js_click(&close)?;
            let save = resolver.resolve_required(&save_path, "line-editor Save button")?;
            self.session.driver().click(&save)?;
        }
        Ok(())
    }

    fn save_button_path() -> ShadowPath {
        ShadowPath::start("#sbPageContainer")
            .then("sb-line-editor")
            .then("#lineEditorPageHeader > #actions sb-custom-action[name=\"Save\"]")
            .then("#mainButton")
    }

    fn add_products_path() -> ShadowPath {
        ShadowPath::start("#sbPageContainer")
            .then("#content > sb-line-editor")
            .then("#actions > sb-custom-action[name=\"Add Products\"]")
            .then("#mainButton")
    }

    fn error_toast_close_path() -> ShadowPath {
        ShadowPath::start("#sbPageContainer")
            .then("#content > sb-line-editor")
            .then("#messages > sb-toast")
            .then("#error_0 > button > i")
    }

    fn alert_close_path() -> ShadowPath {
        ShadowPath::start("#sbPageContainer")
            .then("sb-line-editor")
            .then("#productAlertModal")
            .then("#dialog")
            .then("paper-button")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::fake::{FakeDom, FakeDriver, FakeElement};
    use crate::testdata::TestData;
    use serde_json::json;

    const IFRAME: &str = "//iframe[@title='accessibility title']";

    fn session_over(dom: FakeDom) -> (Session, FakeDriver) {
        let driver = FakeDriver::with_dom(dom);
        let probe = driver.clone();
        let session = Session::with_driver_and_data(
            SuiteConfig {
                max_wait_secs: 1,
                poll_interval_ms: 5,
                ..SuiteConfig::default()
            },
            Box::new(driver),
            TestData::from_value(json!({})),
        );
        (session, probe)
    }

    /// Iframe DOM with the line-editor save button, optionally an error
    /// toast close icon.
    fn save_dom(with_toast: bool) -> FakeDom {
        let mut dom = FakeDom::new();
        let frame = dom.insert(FakeElement::new("iframe").selector(IFRAME));
        let container =
            dom.insert_in_frame(frame, FakeElement::new("div").selector("#sbPageContainer"));
        let editor = dom.insert_shadow_child(
            container,
            FakeElement::new("sb-line-editor")
                .selector("sb-line-editor")
                .selector("#content > sb-line-editor"),
        );
        let action = dom.insert_shadow_child(
            editor,
            FakeElement::new("sb-custom-action")
                .selector("#lineEditorPageHeader > #actions sb-custom-action[name=\"Save\"]"),
        );
        dom.insert_shadow_child(action, FakeElement::new("button").selector("#mainButton"));
        if with_toast {
            let toast = dom.insert_shadow_child(
                editor,
                FakeElement::new("sb-toast").selector("#messages > sb-toast"),
            );
            dom.insert_shadow_child(
                toast,
                FakeElement::new("i").selector("#error_0 > button > i"),
            );
        }
        dom
    }

    #[test]
    fn clean_save_clicks_once() {
        let (session, probe) = session_over(save_dom(false));
        QuotePage::new(&session).click_save_in_iframe().unwrap();
        let clicks = probe
            .journal()
            .iter()
            .filter(|e| *e == "click #mainButton")
            .count();
        assert_eq!(clicks, 1);
    }

    #[test]
    fn toast_dismissal_triggers_exactly_one_retry() {
        let (session, probe) = session_over(save_dom(true));
        QuotePage::new(&session).click_save_in_iframe().unwrap();
        let journal = probe.journal();
        let clicks = journal.iter().filter(|e| *e == "click #mainButton").count();
        assert_eq!(clicks, 2);
        assert!(probe.was_called("js_click #error_0 > button > i"));
    }

    #[test]
    fn proceed_missing_is_not_found() {
        let (session, _) = session_over(FakeDom::new());
        assert!(matches!(
            QuotePage::new(&session).click_proceed().unwrap_err(),
            VenderError::NotFound { .. }
        ));
    }
}
