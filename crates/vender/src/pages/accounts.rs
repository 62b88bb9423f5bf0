//! Accounts tab and the New Account dialog.

use crate::driver::Locator;
use crate::pages::CommonActions;
use crate::result::{VenderError, VenderResult};
use crate::session::Session;

const ACCOUNTS_TAB: &str = "//one-app-nav-bar-item-root[@data-id='Account']//a[@role='button']";
const NEW_ACCOUNT_LINK: &str = "//div[@class='menuItemsWrapper']//span[text()='New Account']";
const ACCOUNT_NAME_INPUT: &str = "//input[@name='Name']";
const STATUS_DROPDOWN: &str =
    "//*[@field-label='Account Status']//span[@part='input-button-value']";
const CURRENCY_DROPDOWN: &str =
    "//*[@field-label='Account Currency']//span[@part='input-button-value']";
const SOURCE_DROPDOWN: &str =
    "//*[@field-label='Account Source']//span[@part='input-button-value']";

pub struct AccountsPage<'a> {
    session: &'a Session,
    common: CommonActions<'a>,
}

impl<'a> AccountsPage<'a> {
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
            .visible(&Locator::xpath(ACCOUNTS_TAB))
            .ok_or_else(|| VenderError::not_found("Accounts tab"))?;
        Ok(())
    }

    pub fn click_new_account_from_dropdown(&self) -> VenderResult<()> {
        let tab = self
            .session
            .waiter()
            .visible(&Locator::xpath(ACCOUNTS_TAB))
            .ok_or_else(|| VenderError::not_found("Accounts tab"))?;
        self.session.driver().js_click(&tab)?;
        let link = self
            .session
            .waiter()
            .visible(&Locator::xpath(NEW_ACCOUNT_LINK))
            .ok_or_else(|| VenderError::not_found("New Account menu item"))?;
        self.session.driver().js_click(&link)?;
        self.session.reporter().info("Opened New Account dialog");
        Ok(())
    }

    pub fn is_dialog_header_correct(&self, expected: &str) -> VenderResult<bool> {
        self.common.dialog_header_matches(expected)
    }

    /// Pick a record type radio button by its visible label.
    pub fn select_record_type(&self, record_type: &str) -> VenderResult<()> {
        let radio = Locator::xpath(format!(
            "//div[@class='changeRecordTypeOptionRightColumn']/span[text()='{record_type}']/../../div/input[@type='radio']"
        ));
        let button = self
            .session
            .waiter()
            .visible(&radio)
            .ok_or_else(|| VenderError::not_found(format!("record type '{record_type}'")))?;
        self.session.driver().js_click(&button)?;
        self.session
            .reporter()
            .info(format!("Selected record type: {record_type}"));
        Ok(())
    }

    pub fn click_next(&self) -> VenderResult<()> {
        self.common.click_next()
    }

    pub fn enter_account_name(&self, account_name: &str) -> VenderResult<()> {
        let input = self
            .session
            .waiter()
            .visible(&Locator::xpath(ACCOUNT_NAME_INPUT))
            .ok_or_else(|| VenderError::not_found("account name input"))?;
        self.session.driver().type_text(&input, account_name)?;
        self.session
            .reporter()
            .info(format!("Entered account name: {account_name}"));
        Ok(())
    }

    pub fn select_status(&self, status: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(STATUS_DROPDOWN),
            &Locator::xpath(format!(
                "//*[@field-label='Account Status']//div[@part='dropdown overlay']//span[text()='{status}']"
            )),
            "account status",
        )
    }

    pub fn select_currency(&self, currency: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(CURRENCY_DROPDOWN),
            &Locator::xpath(format!(
                "//*[@field-label='Account Currency']//div[@part='dropdown overlay']//span[text()='{currency}']"
            )),
            "account currency",
        )
    }

    pub fn select_source(&self, source: &str) -> VenderResult<()> {
        self.common.select_from_dropdown(
            &Locator::xpath(SOURCE_DROPDOWN),
            &Locator::xpath(format!(
                "//*[@field-label='Account Source']//div[@part='dropdown overlay']//span[text()='{source}']"
            )),
            "account source",
        )
    }

    pub fn click_save(&self) -> VenderResult<()> {
        self.common.click_save()
    }

    /// Detail view shows the created account under the entity label.
    pub fn is_account_name_displayed(
        &self,
        entity_label: &str,
        expected_name: &str,
    ) -> VenderResult<bool> {
        let actual = self.common.primary_field_text(entity_label)?;
        self.session.reporter().info(format!(
            "Account primary field: '{actual}', expected '{expected_name}'"
        ));
        Ok(actual == expected_name)
    }
}
