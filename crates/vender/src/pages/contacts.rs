//! Contacts tab and the New Contact dialog.

use crate::driver::Locator;
use crate::pages::CommonActions;
use crate::result::{VenderError, VenderResult};
use crate::session::Session;

const CONTACTS_TAB: &str = "//one-app-nav-bar-item-root[@data-id='Contact']//a[@role='button']";
const NEW_CONTACT_LINK: &str = "//div[@class='menuItemsWrapper']//span[text()='New Contact']";
const SALUTATION_DROPDOWN: &str =
    "//*[@aria-label='Salutation']//span[@part='input-button-value']";
const FIRST_NAME_INPUT: &str = "//input[@name='firstName']";
const LAST_NAME_INPUT: &str = "//input[@name='lastName']";
const ACCOUNT_COMBOBOX: &str =
    "//label[text()='Account Name']//following-sibling::div//input[@role='combobox']";
const EMAIL_INPUT: &str = "//input[@name='Email']";
const LANGUAGE_DROPDOWN: &str =
    "//*[@aria-label='Primary Language']//span[@part='input-button-value']";
const LEAD_SOURCE_DROPDOWN: &str =
    "//*[@aria-label='Lead Source']//span[@part='input-button-value']";

pub struct ContactsPage<'a> {
    session: &'a Session,
    common: CommonActions<'a>,
}

impl<'a> ContactsPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            common: CommonActions::new(session),
        }
    }

    pub fn wait_until_tab_visible(&self) -> VenderResult<()> {
        self.common.wait_for_spinner_gone();
        self.session
            .waiter()
            .visible(&Locator::xpath(CONTACTS_TAB))
            .ok_or_else(|| VenderError::not_found("Contacts tab"))?;
        Ok(())
    }

    pub fn click_new_contact_from_dropdown(&self) -> VenderResult<()> {
        let tab = self
            .session
            .waiter()
            .visible(&Locator::xpath(CONTACTS_TAB))
            .ok_or_else(|| VenderError::not_found("Contacts tab"))?;
        self.session.driver().js_click(&tab)?;
        let link = self
            .session
            .waiter()
            .visible(&Locator::xpath(NEW_CONTACT_LINK))
            .ok_or_else(|| VenderError::not_found("New Contact menu item"))?;
        self.session.driver().js_click(&link)?;
        self.session.reporter().info("Opened New Contact dialog");
        Ok(())
    }

    pub fn is_dialog_header_correct(&self, expected: &str) -> VenderResult<bool> {
        self.common.dialog_header_matches(expected)
    }

    pub fn select_salutation(&self, salutation: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(SALUTATION_DROPDOWN),
            &Locator::xpath(format!(
                "//div[@part='dropdown overlay']//span[text()='{salutation}']"
            )),
            "salutation",
        )
    }

    pub fn enter_first_name(&self, first_name: &str) -> VenderResult<()> {
        self.type_into(FIRST_NAME_INPUT, first_name, "first name")
    }

    pub fn enter_last_name(&self, last_name: &str) -> VenderResult<()> {
        self.type_into(LAST_NAME_INPUT, last_name, "last name")
    }

    /// Attach the contact to an account through the lookup combobox.
    pub fn select_account_name(&self, account_name: &str) -> VenderResult<()> {
        self.common.pick_from_combobox(
            &Locator::xpath(ACCOUNT_COMBOBOX),
            account_name,
            &Locator::xpath(format!(
                "//label[text()='Account Name']/..//div[@part='dropdown overlay']//span[text()='{account_name}']"
            )),
            "account name",
        )
    }

    pub fn enter_email(&self, email: &str) -> VenderResult<()> {
        self.type_into(EMAIL_INPUT, email, "email")
    }

    pub fn select_primary_language(&self, language: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(LANGUAGE_DROPDOWN),
            &Locator::xpath(format!(
                "//div[@aria-label='Primary Language']//*[text()='{language}']"
            )),
            "primary language",
        )
    }

    pub fn select_lead_source(&self, lead_source: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(LEAD_SOURCE_DROPDOWN),
            &Locator::xpath(format!(
                "//label[text()='Lead Source']/..//div[@part='dropdown overlay']//span[text()='{lead_source}']"
            )),
            "lead source",
        )
    }

    pub fn click_save(&self) -> VenderResult<()> {
        self.common.click_save()
    }

    /// Contains-match: the detail header decorates the name with the
    /// salutation, so only the last name is compared.
    pub fn is_contact_name_displayed(
        &self,
        entity_label: &str,
        expected_fragment: &str,
    ) -> VenderResult<bool> {
        let actual = self.common.primary_field_text(entity_label)?;
        self.session.reporter().info(format!(
            "Contact primary field: '{actual}', expecting fragment '{expected_fragment}'"
        ));
        Ok(actual.contains(expected_fragment))
    }

    fn type_into(&self, xpath: &str, text: &str, what: &str) -> VenderResult<()> {
        let input = self
            .session
            .waiter()
            .visible(&Locator::xpath(xpath))
            .ok_or_else(|| VenderError::not_found(format!("{what} input")))?;
        self.session.driver().scroll_into_view(&input)?;
        self.session.driver().type_text(&input, text)?;
        self.session
            .reporter()
            .info(format!("Entered {what}: {text}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::fake::{FakeDom, FakeDriver, FakeElement};
    use crate::testdata::TestData;
    use serde_json::json;

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

    #[test]
    fn account_lookup_sets_value_through_script() {
        let option = "//label[text()='Account Name']/..//div[@part='dropdown overlay']//span[text()='ANab12345']";
        let mut dom = FakeDom::new();
        dom.insert(FakeElement::new("input").selector(ACCOUNT_COMBOBOX));
        dom.insert(FakeElement::new("span").selector(option));
        let (session, probe) = session_over(dom);
        ContactsPage::new(&session)
            .select_account_name("ANab12345")
            .unwrap();
        assert_eq!(probe.value_of(ACCOUNT_COMBOBOX).unwrap(), "ANab12345");
        assert!(probe.was_called(&format!("js_click {option}")));
    }

    #[test]
    fn contact_verification_is_contains_match() {
        let primary = "//*[@slot='entityLabel' and text()='Contact']/../../following-sibling::slot//*[@slot='primaryField']";
        let mut dom = FakeDom::new();
        dom.insert(
            FakeElement::new("div")
                .selector(primary)
                .text("Mr. FNx1 LNy2"),
        );
        let (session, _) = session_over(dom);
        let page = ContactsPage::new(&session);
        assert!(page.is_contact_name_displayed("Contact", "LNy2").unwrap());
        assert!(!page.is_contact_name_displayed("Contact", "LNzz").unwrap());
    }
}
